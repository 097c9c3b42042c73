#[tokio::main]
async fn main() -> Result<(), rxparse_lib::api::ServerError> {
    rxparse_lib::run().await
}
