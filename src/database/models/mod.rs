pub mod breed;
pub mod kitten;
pub mod rating;
pub mod user;

pub use breed::{Breed, BreedInput, BreedPayload};
pub use kitten::{Kitten, KittenFilter, KittenInput, KittenPayload};
pub use rating::{KittenStats, Rating, RatingInput, RatingPayload};
pub use user::{NewUser, RegisterPayload, Registration, User, UserProfile};
