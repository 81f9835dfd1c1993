use dotenvy::dotenv;
use order_store::{connect, AppError, DieselOrderStore, OrderService, StoreConfig};

fn main() -> Result<(), AppError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = StoreConfig::from_env()?;
    let pool = connect(&config)?;

    let service = OrderService::new(DieselOrderStore::new(pool));
    let cached = service.warm_up()?;

    log::info!("serving {} order(s) from cache", cached);
    Ok(())
}
