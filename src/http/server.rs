/// HTTP server for the habit service
///
/// Accepts JSON requests, dispatches them to the service layer, and maps
/// results onto HTTP status codes:
///
///   GET    /                      liveness message
///   GET    /habits                list habits (with today's counts)
///   POST   /habits                create habit (201)
///   GET    /habits/{id}           habit detail
///   PATCH  /habits/{id}           merge-patch update
///   POST   /habits/{id}/complete  record a completion
///   DELETE /habits/{id}           soft delete (204)
///
/// Not-found habits answer 404, malformed bodies and ids 422, storage
/// failures 500. Every response carries permissive CORS headers.

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info};

use crate::domain::HabitId;
use crate::service::{
    self, CreateHabitParams, ServiceError, UpdateHabitParams,
};
use crate::storage::HabitStore;

/// HTTP front end over a habit store
pub struct HttpServer<S: HabitStore> {
    storage: Arc<S>,
}

impl<S: HabitStore> HttpServer<S> {
    /// Create a new HTTP server over the given store
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Accept and handle requests until the listener shuts down
    pub fn run(&self, addr: &str) -> std::io::Result<()> {
        let server = Server::http(addr)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

        info!("Listening on http://{}", addr);

        for request in server.incoming_requests() {
            if let Err(e) = self.handle_request(request) {
                error!("Failed to respond to request: {}", e);
            }
        }

        Ok(())
    }

    /// Route one request to its handler
    fn handle_request(&self, request: Request) -> std::io::Result<()> {
        let url = request.url().to_string();
        let path = url.split('?').next().unwrap_or("/");
        let method = request.method().clone();

        debug!("{} {}", method, path);

        // CORS preflight
        if method == Method::Options {
            return respond(request, Response::from_string("").with_status_code(204));
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match (method, segments.as_slice()) {
            (Method::Get, []) => json_response(
                request,
                200,
                &json!({"message": "Habit Tracker API running"}),
            ),

            (Method::Get, ["habits"]) => self.handle_list(request),
            (Method::Post, ["habits"]) => self.handle_create(request),

            (Method::Get, ["habits", id]) => {
                let id = id.to_string();
                self.handle_get(request, &id)
            }
            (Method::Patch, ["habits", id]) => {
                let id = id.to_string();
                self.handle_update(request, &id)
            }
            (Method::Delete, ["habits", id]) => {
                let id = id.to_string();
                self.handle_delete(request, &id)
            }
            (Method::Post, ["habits", id, "complete"]) => {
                let id = id.to_string();
                self.handle_complete(request, &id)
            }

            _ => detail_response(request, 404, "Not found"),
        }
    }

    fn handle_list(&self, request: Request) -> std::io::Result<()> {
        match service::list_habits(self.storage.as_ref()) {
            Ok(habits) => json_response(request, 200, &habits),
            Err(e) => service_error_response(request, e),
        }
    }

    fn handle_create(&self, mut request: Request) -> std::io::Result<()> {
        let params: CreateHabitParams = match read_json_body(&mut request) {
            Ok(p) => p,
            Err(msg) => return detail_response(request, 422, &msg),
        };

        match service::create_habit(self.storage.as_ref(), params) {
            Ok(habit) => json_response(request, 201, &habit),
            Err(e) => service_error_response(request, e),
        }
    }

    fn handle_get(&self, request: Request, id: &str) -> std::io::Result<()> {
        let habit_id = match parse_habit_id(id) {
            Ok(id) => id,
            Err(msg) => return detail_response(request, 422, &msg),
        };

        match service::get_habit(self.storage.as_ref(), &habit_id) {
            Ok(habit) => json_response(request, 200, &habit),
            Err(e) => service_error_response(request, e),
        }
    }

    fn handle_update(&self, mut request: Request, id: &str) -> std::io::Result<()> {
        let habit_id = match parse_habit_id(id) {
            Ok(id) => id,
            Err(msg) => return detail_response(request, 422, &msg),
        };
        let params: UpdateHabitParams = match read_json_body(&mut request) {
            Ok(p) => p,
            Err(msg) => return detail_response(request, 422, &msg),
        };

        match service::update_habit(self.storage.as_ref(), &habit_id, params) {
            Ok(habit) => json_response(request, 200, &habit),
            Err(e) => service_error_response(request, e),
        }
    }

    fn handle_complete(&self, request: Request, id: &str) -> std::io::Result<()> {
        let habit_id = match parse_habit_id(id) {
            Ok(id) => id,
            Err(msg) => return detail_response(request, 422, &msg),
        };

        match service::complete_habit(self.storage.as_ref(), &habit_id) {
            Ok(habit) => json_response(request, 200, &habit),
            Err(e) => service_error_response(request, e),
        }
    }

    fn handle_delete(&self, request: Request, id: &str) -> std::io::Result<()> {
        let habit_id = match parse_habit_id(id) {
            Ok(id) => id,
            Err(msg) => return detail_response(request, 422, &msg),
        };

        match service::delete_habit(self.storage.as_ref(), &habit_id) {
            Ok(()) => respond(request, Response::from_string("").with_status_code(204)),
            Err(e) => service_error_response(request, e),
        }
    }
}

/// Parse a path segment into a habit id
fn parse_habit_id(id: &str) -> Result<HabitId, String> {
    HabitId::from_string(id).map_err(|_| format!("Invalid habit id: {}", id))
}

/// Read and decode a JSON request body
fn read_json_body<T: serde::de::DeserializeOwned>(request: &mut Request) -> Result<T, String> {
    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .map_err(|e| format!("Failed to read body: {}", e))?;

    serde_json::from_str(&body).map_err(|e| format!("Invalid JSON body: {}", e))
}

/// Map a service error onto its HTTP representation
fn service_error_response(request: Request, err: ServiceError) -> std::io::Result<()> {
    match err {
        ServiceError::NotFound { .. } => detail_response(request, 404, "Habit not found"),
        ServiceError::Domain(e) => detail_response(request, 422, &e.to_string()),
        ServiceError::Storage(e) => {
            error!("Storage failure: {}", e);
            detail_response(request, 500, "Internal server error")
        }
    }
}

/// Send a JSON body with the given status code
fn json_response<T: Serialize>(
    request: Request,
    status: u16,
    body: &T,
) -> std::io::Result<()> {
    let json = serde_json::to_string(body)?;
    let response = Response::from_string(json)
        .with_status_code(status)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
    respond(request, response)
}

/// Send an error body in the `{"detail": ...}` shape
fn detail_response(request: Request, status: u16, detail: &str) -> std::io::Result<()> {
    json_response(request, status, &json!({"detail": detail}))
}

/// Attach CORS headers and send
fn respond<R: Read>(request: Request, response: Response<R>) -> std::io::Result<()> {
    let response = response
        .with_header(
            Header::from_bytes(&b"Access-Control-Allow-Origin"[..], &b"*"[..]).unwrap(),
        )
        .with_header(
            Header::from_bytes(
                &b"Access-Control-Allow-Methods"[..],
                &b"GET, POST, PATCH, DELETE, OPTIONS"[..],
            )
            .unwrap(),
        )
        .with_header(
            Header::from_bytes(&b"Access-Control-Allow-Headers"[..], &b"Content-Type"[..])
                .unwrap(),
        );
    request.respond(response)
}
