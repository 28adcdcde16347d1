//! Router construction from configuration.
//!
//! # Responsibilities
//! - Register every configured static route on a new router
//! - Render response bodies with bound parameters substituted
//! - Expose registered routes at `GET /_routes`

use std::collections::BTreeMap;

use axum::http::Method;

use crate::config::schema::RouterConfig;
use crate::http::{Control, Router};
use crate::routing::{Params, RouteError};

/// Path of the built-in route listing.
pub const ROUTES_PATH: &str = "/_routes";

/// Error building a router from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("route {index}: invalid method {method:?}")]
    Method { index: usize, method: String },

    #[error("route {index}: {source}")]
    Route { index: usize, source: RouteError },
}

/// Build a router serving the configured routes plus `GET /_routes`.
pub fn build_router(config: &RouterConfig) -> Result<Router, BuildError> {
    let mut router = Router::with_max_segments(config.routing.max_segments);
    router.use_options_replies(config.routing.options_replies);

    for (index, route) in config.routes.iter().enumerate() {
        let method: Method = route.method.parse().map_err(|_| BuildError::Method {
            index,
            method: route.method.clone(),
        })?;

        let status = route.status;
        let template = route.body.clone();
        router
            .handle(method, &route.path, move |c: &mut Control| {
                c.code(status);
                let body = render_body(&template, c.params());
                c.body(body);
            })
            .map_err(|source| BuildError::Route { index, source })?;
    }

    let mut listing = route_listing(&router);
    listing
        .entry(Method::GET.to_string())
        .or_default()
        .push(ROUTES_PATH.to_string());
    router
        .get(ROUTES_PATH, move |c: &mut Control| c.body_json(&listing))
        .map_err(|source| BuildError::Route {
            index: config.routes.len(),
            source,
        })?;

    tracing::info!(routes = router.table().len(), "Routes registered");
    Ok(router)
}

/// Substitute `{key}` in `template` with the value of each parameter.
pub fn render_body(template: &str, params: &Params) -> String {
    params.iter().fold(template.to_string(), |body, param| {
        body.replace(&format!("{{{}}}", param.key), &param.value)
    })
}

fn route_listing(router: &Router) -> BTreeMap<String, Vec<String>> {
    let table = router.table();
    table
        .methods()
        .into_iter()
        .map(|method| {
            let routes = table.routes(&method).into_iter().map(String::from).collect();
            (method.to_string(), routes)
        })
        .collect()
}
