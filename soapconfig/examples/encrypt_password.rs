//! Outil CLI pour chiffrer/déchiffrer les mots de passe des services
//!
//! Usage:
//!   cargo run --example encrypt_password -- encrypt "mon_mot_de_passe"
//!   cargo run --example encrypt_password -- decrypt "encrypted:ABC123..."

use anyhow::{anyhow, Result};
use soapconfig::encryption::{decrypt_password, encrypt_password, is_encrypted};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("encrypt"), Some(password)) => {
            let encrypted = encrypt_password(password)?;
            println!("Encrypted: {}", encrypted);
            println!("\nAdd this to the service entry in config.yaml:");
            println!("    password: \"{}\"", encrypted);
        }
        (Some("decrypt"), Some(encrypted)) => {
            if !is_encrypted(encrypted) {
                return Err(anyhow!("Value does not start with 'encrypted:'"));
            }
            // Échoue si la valeur a été chiffrée sur une autre machine
            println!("Decrypted: {}", decrypt_password(encrypted)?);
        }
        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    println!("Usage:");
    println!("  cargo run --example encrypt_password -- encrypt <password>");
    println!("  cargo run --example encrypt_password -- decrypt <encrypted>");
}
