use crate::{
    api::{calculate, city, result, salary},
    config::{Config, ConfigError},
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route limiter state, built once and shared by every worker.
pub struct RateLimits {
    calculate: LimiterConfig,
    upload: LimiterConfig,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            calculate: build_limiter("RATE_CALCULATE_PER_MIN", config.rate_calculate_per_min)?,
            upload: build_limiter("RATE_UPLOAD_PER_MIN", config.rate_upload_per_min)?,
        })
    }
}

fn build_limiter(name: &'static str, requests_per_min: u32) -> Result<LimiterConfig, ConfigError> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or(ConfigError::Invalid {
            name,
            value: requests_per_min.to_string(),
        })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    cfg.service(
        web::scope(&config.api_prefix)
            // /calculate
            .service(
                web::resource("/calculate")
                    .wrap(Governor::new(&limits.calculate))
                    .route(web::post().to(calculate::calculate))
                    .route(web::get().to(calculate::calculate_usage)),
            )
            // /salaries
            .service(
                web::resource("/salaries")
                    .wrap(Governor::new(&limits.upload))
                    .route(web::post().to(salary::upload_salaries))
                    .route(web::get().to(salary::list_salaries)),
            )
            // /cities
            .service(
                web::resource("/cities")
                    .wrap(Governor::new(&limits.upload))
                    .route(web::post().to(city::upload_cities))
                    .route(web::get().to(city::list_cities)),
            )
            // /results
            .service(web::resource("/results").route(web::get().to(result::list_results))),
    );
}
