pub mod engagement;
pub mod personalization;
pub mod recommendations;
pub mod roles;
pub mod routing;
pub mod tracker;
