mod compat;
mod helpers;
mod round_trip;
