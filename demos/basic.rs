//! Minimal linelog example — a couple of endpoints with access logging.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -u alice:secret -H 'x-request-id: 7f3a9c' http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl http://localhost:3000/nothing-here
//!
//! Access lines go to stdout; diagnostics from `tracing` go to stderr.

use http::Method;
use http::header::{CONTENT_TYPE, HeaderValue, LOCATION};
use linelog::{AccessLog, Request, ResponseWriter, Server, handler_fn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let log = AccessLog::builder(std::io::stdout())
        .on_error(|e| eprintln!("access log write failed: {e}"))
        .build();

    let app = log.wrap(handler_fn(|req, res| Box::pin(route(req, res))));

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

async fn route(req: &Request, res: &mut dyn ResponseWriter) {
    let method = req.method();
    match req.path().strip_prefix("/users") {
        Some("") if *method == Method::POST => create_user(req, res),
        Some(rest) if *method == Method::GET => match rest.strip_prefix('/') {
            Some(id) if !id.is_empty() && !id.contains('/') => get_user(id, res),
            _ => res.set_status(404),
        },
        _ => res.set_status(404),
    }
}

// GET /users/{id}
fn get_user(id: &str, res: &mut dyn ResponseWriter) {
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let _ = res.write(format!(r#"{{"id":"{id}","name":"alice"}}"#).as_bytes());
}

// POST /users → 201 Created, or 400 without a body
fn create_user(req: &Request, res: &mut dyn ResponseWriter) {
    if req.body().is_empty() {
        res.set_status(400);
        return;
    }
    res.headers_mut().insert(LOCATION, HeaderValue::from_static("/users/99"));
    res.set_status(201);
    let _ = res.write(br#"{"id":"99","name":"new_user"}"#);
}

#[cfg(test)]
mod tests {
    use super::*;
    use linelog::BufferedResponse;

    async fn status_of(method: Method, path: &str) -> u16 {
        let req = Request::builder().method(method).path(path).body("{}").build();
        let mut res = BufferedResponse::new();
        route(&req, &mut res).await;
        res.status().unwrap_or(200)
    }

    #[tokio::test]
    async fn user_id_needs_its_own_segment() {
        assert_eq!(status_of(Method::GET, "/users/42").await, 200);
        assert_eq!(status_of(Method::GET, "/users42").await, 404);
        assert_eq!(status_of(Method::GET, "/users/").await, 404);
        assert_eq!(status_of(Method::GET, "/users/4/2").await, 404);
        assert_eq!(status_of(Method::POST, "/users").await, 201);
    }
}
