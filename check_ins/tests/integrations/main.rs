#![deny(unsafe_code)]

mod postgres_store;
