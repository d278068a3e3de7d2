//! Hash a password for the `auth.password_hash` config field.
//!
//! Usage: `rota-hashpw <password>` — prints the argon2 PHC string.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};

fn main() -> anyhow::Result<()> {
    let password = std::env::args().nth(1).ok_or_else(|| {
        anyhow::anyhow!("usage: rota-hashpw <password>")
    })?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;

    println!("{hash}");
    Ok(())
}
