use anyhow::Result;

use pngbatch::bootstrap::setup::initialize;
use pngbatch::build_rocket;

#[rocket::main]
async fn main() -> Result<()> {
    initialize();

    let _rocket = build_rocket().launch().await?;

    Ok(())
}
