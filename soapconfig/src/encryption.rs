//! Chiffrement des mots de passe de services
//!
//! Les mots de passe HTTP des services peuvent être stockés chiffrés dans
//! `config.yaml` sous la forme `encrypted:BASE64`. La clé AES-256-GCM est
//! dérivée d'un identifiant de la machine : le fichier n'est donc pas
//! portable d'une machine à l'autre.
//!
//! La variable `SOAPWRAPPER_MACHINE_ID` remplace l'identifiant matériel
//! (conteneurs sans `/etc/machine-id`, CI...).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use base64::Engine;
use sha2::{Digest, Sha256};

/// Préfixe des valeurs chiffrées
const ENCRYPTED_PREFIX: &str = "encrypted:";

const ENV_MACHINE_ID: &str = "SOAPWRAPPER_MACHINE_ID";
const KEY_SALT: &[u8] = b"soapwrapper-password-key-v1";
const NONCE_SALT: &[u8] = b"soapwrapper-password-nonce-v1";
const NONCE_LEN: usize = 12;

/// Identifiant stable de la machine
fn machine_id() -> Result<String> {
    if let Ok(id) = std::env::var(ENV_MACHINE_ID) {
        if !id.trim().is_empty() {
            return Ok(id.trim().to_string());
        }
    }
    platform_machine_id()
}

#[cfg(target_os = "linux")]
fn platform_machine_id() -> Result<String> {
    ["/etc/machine-id", "/var/lib/dbus/machine-id"]
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow!("Failed to read machine-id"))
}

#[cfg(target_os = "macos")]
fn platform_machine_id() -> Result<String> {
    let output = std::process::Command::new("ioreg")
        .args(["-d2", "-c", "IOPlatformExpertDevice"])
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    // "IOPlatformUUID" = "XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX"
    stdout
        .lines()
        .find(|line| line.contains("IOPlatformUUID"))
        .and_then(|line| line.split('"').nth(3))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Failed to extract IOPlatformUUID from ioreg"))
}

#[cfg(target_os = "windows")]
fn platform_machine_id() -> Result<String> {
    let output = std::process::Command::new("wmic")
        .args(["csproduct", "get", "UUID"])
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    stdout
        .lines()
        .nth(1)
        .map(|line| line.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow!("Failed to extract UUID from wmic"))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_machine_id() -> Result<String> {
    Err(anyhow!(
        "Unsupported platform, set {} to enable password encryption",
        ENV_MACHINE_ID
    ))
}

fn salted_digest(data: &[u8], salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.update(salt);

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

fn cipher() -> Result<Aes256Gcm> {
    let key = salted_digest(machine_id()?.as_bytes(), KEY_SALT);
    Aes256Gcm::new_from_slice(&key).map_err(|e| anyhow!("Failed to create cipher: {}", e))
}

/// Chiffre un mot de passe
///
/// Le nonce est dérivé du mot de passe : le même mot de passe donne toujours
/// la même valeur, ce qui évite de réécrire `config.yaml` inutilement.
/// Format encodé : nonce (12 octets) + ciphertext.
pub fn encrypt_password(password: &str) -> Result<String> {
    let cipher = cipher()?;

    let digest = salted_digest(password.as_bytes(), NONCE_SALT);
    let nonce_bytes = &digest[..NONCE_LEN];

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce_bytes), password.as_bytes())
        .map_err(|e| anyhow!("Encryption failed: {}", e))?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(format!(
        "{}{}",
        ENCRYPTED_PREFIX,
        base64::engine::general_purpose::STANDARD.encode(&combined)
    ))
}

/// Déchiffre une valeur `encrypted:BASE64`
pub fn decrypt_password(encrypted: &str) -> Result<String> {
    let encoded = encrypted
        .strip_prefix(ENCRYPTED_PREFIX)
        .ok_or_else(|| anyhow!("Invalid encrypted password format (missing prefix)"))?;

    let combined = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| anyhow!("Invalid base64: {}", e))?;

    if combined.len() < NONCE_LEN {
        return Err(anyhow!("Invalid ciphertext (too short)"));
    }
    let (nonce, ciphertext) = combined.split_at(NONCE_LEN);

    let plaintext = cipher()?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| anyhow!("Decryption failed (wrong machine or corrupted data): {}", e))?;

    String::from_utf8(plaintext).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
}

pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX)
}

/// Retourne le mot de passe en clair, qu'il soit stocké chiffré ou non
pub fn get_password(value: &str) -> Result<String> {
    if is_encrypted(value) {
        decrypt_password(value)
    } else {
        Ok(value.to_string())
    }
}
