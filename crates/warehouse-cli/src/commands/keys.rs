//! Key management commands.
//!
//! `warehouse keys generate` - Generate a new RSA keypair for the authority.

use std::fs;
use std::path::PathBuf;
use warehouse_token::KeyPair;

/// Generate a new RSA keypair.
pub fn generate(bits: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let keypair = KeyPair::generate(bits)?;

    if let Some(output_dir) = output {
        // Create output directory if it doesn't exist
        fs::create_dir_all(&output_dir)?;

        let private_path = output_dir.join("private.pem");
        let public_path = output_dir.join("public.pem");

        keypair.save_to_files(&private_path, &public_path)?;

        println!("✔ Generated {}-bit RSA keypair:", bits);
        println!("  Private key: {}", private_path.display());
        println!("  Public key:  {}", public_path.display());
        println!();
        println!("⚠️  Keep your private key secure! Only the authority should hold it.");
        println!();
        println!("Set as environment variable for `warehouse token decode`:");
        println!(
            "  export WAREHOUSE_PRIVATE_KEY=\"$(cat {})\"",
            private_path.display()
        );
    } else {
        // Print to stdout
        println!("{}", keypair.private_key_pem()?);
        println!("{}", keypair.public_key_pem()?);
        println!("Use --output <dir> to save keys to files.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warehouse_token::keys::load_public_key_file;

    #[test]
    fn test_generate_keys_to_files() {
        let dir = tempdir().unwrap();
        generate(1024, Some(dir.path().to_path_buf())).unwrap();

        let keypair = KeyPair::load_from_file(&dir.path().join("private.pem")).unwrap();
        let public_key = load_public_key_file(&dir.path().join("public.pem")).unwrap();
        assert_eq!(keypair.public_key(), &public_key);
    }
}
