//! Contains the implementations of the elementary functions and constants
//! on `Float`.

mod constants;
mod exp;
mod functions;
mod trig;
