//! Hash a password for the ADMIN_HASH_PASSWORD environment variable.
//!
//! Usage: cargo run --bin hash-password -- <password>

use bcrypt::{hash, DEFAULT_COST};

fn main() {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            eprintln!("Usage: hash-password <password>");
            std::process::exit(1);
        }
    };

    match hash(&password, DEFAULT_COST) {
        Ok(hashed) => println!("{}", hashed),
        Err(e) => {
            eprintln!("Failed to hash password: {}", e);
            std::process::exit(1);
        }
    }
}
