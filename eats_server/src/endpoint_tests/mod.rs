mod helpers;
mod mocks;

mod orders;
mod restaurants;
mod users;
mod webhook;
