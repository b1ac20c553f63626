//! Metrics server module
//!
//! This module provides an HTTP server to expose Prometheus metrics for scraping.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use tracing::{error, info};

use crate::utils::metrics::gather_metrics;

/// Metrics endpoint handler
async fn metrics_handler() -> impl Responder {
	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Create metrics server bound to `bind_address`
pub fn create_metrics_server(bind_address: String) -> std::io::Result<actix_web::dev::Server> {
	info!("Starting metrics server on {}", bind_address);

	Ok(HttpServer::new(|| {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(1)
	.bind(bind_address)?
	.shutdown_timeout(5)
	.run())
}
