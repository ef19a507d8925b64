// Endpoint methods on `ApiClient`, one file per backend resource.
//
// Each method maps to exactly one HTTP call and returns the unwrapped
// `data` payload; error classification is left to the caller.

mod auth;
mod branches;
mod logs;
mod modules;
mod printing;
mod stock;
mod teachers;
