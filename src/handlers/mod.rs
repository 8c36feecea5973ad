// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer access token)
pub mod public; // Service info, registration and token acquisition
pub mod protected; // Breed, kitten and rating resources under /api/
