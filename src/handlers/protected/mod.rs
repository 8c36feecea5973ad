// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: bearer access token, checked by `jwt_auth_middleware`
// Handlers receive the requester as `Extension<AuthUser>`; role and ownership
// checks happen in the services.

pub mod breeds; // /api/breeds/ (participant-only)
pub mod kittens; // /api/kittens/
pub mod ratings; // /api/ratings/ and kitten-stats
