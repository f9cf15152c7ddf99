pub mod rate_proxy;

pub use rate_proxy::RateProxyProvider;
