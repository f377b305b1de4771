use actix_cors::Cors;

/// Browser front-ends call from their own origins; access is gated by the API key instead.
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
