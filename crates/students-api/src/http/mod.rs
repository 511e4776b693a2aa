//! HTTP REST API endpoints.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/students` | POST | Create student |
//! | `/api/students` | GET | List students |
//! | `/api/students/{id}` | GET | Get student |
//! | `/api/students/{id}` | PUT/PATCH | Update student |
//! | `/api/students/{id}` | DELETE | Delete student |
//! | `/health` | GET | Liveness check |

pub mod response;
pub mod routes;
pub mod state;

pub use response::{ApiError, ApiResult, STATUS_ERROR, STATUS_OK};
pub use routes::{create_router, create_router_with_body_limit, JsonBody, DEFAULT_BODY_LIMIT};
pub use state::AppState;
