// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: none beyond the global CORS/trace layers

pub mod register; // POST /api/register/
pub mod service; // GET / and GET /health
pub mod token; // POST /api/token/ and /api/token/refresh/
