pub mod ecb;
pub mod open_exchange_rates;
pub mod util;

pub use ecb::EcbProvider;
pub use open_exchange_rates::OpenExchangeRatesProvider;
