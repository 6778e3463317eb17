use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::cipher::{AlgorithmDescriptor, HashAlgorithm};
use crate::error::Error;
use crate::config::{DEFAULT_S2K_COUNT, PASSPHRASE_MIN_LENGTH};
use crate::file::File;
use crate::packet::Deserializer;
use crate::processor::{Decryptor, EncryptOptions, Processor};
use crate::s2k::S2kMode;
use crate::secret::Secret;
use crate::types::{IntegrityPolicy, Processing, ProcessorMode};
use crate::ui::prompt::Prompt;

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file with a passphrase
    Encrypt {
        #[arg(short, long)]
        input: String,

        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        /// 3DES, AES128, AES192 or AES256
        #[arg(long, default_value = "AES256")]
        cipher_algo: String,

        /// 0 (simple), 1 (salted) or 3 (iterated and salted)
        #[arg(long, default_value_t = 3)]
        s2k_mode: u8,

        /// MD5, SHA1, SHA224, SHA256, SHA384 or SHA512
        #[arg(long, default_value = "SHA256")]
        s2k_digest_algo: String,

        #[arg(long, default_value_t = DEFAULT_S2K_COUNT)]
        s2k_count: u32,
    },

    /// Decrypt a file and print what it contained
    Decrypt {
        #[arg(short, long)]
        input: String,

        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        /// Fail instead of warning when the modification detection code does not match
        #[arg(long)]
        strict: bool,
    },

    /// List the packets of a file
    List {
        #[arg(short, long)]
        input: String,
    },
}

#[derive(Parser)]
#[command(name = "sweetpgp", version = "26.1.0", about = "Encrypt files with a passphrase in the OpenPGP format, using AES or 3DES.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

impl App {
    pub fn init() -> Result<Self> {
        let subscriber = tracing_subscriber::fmt().with_file(true).with_line_number(true).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    pub fn execute(self) -> Result<()> {
        let prompt = Prompt::new(PASSPHRASE_MIN_LENGTH);
        match self.command {
            Commands::Encrypt { input, output, password, cipher_algo, s2k_mode, s2k_digest_algo, s2k_count } => {
                let options = EncryptOptions {
                    algorithm: AlgorithmDescriptor::from_name(&cipher_algo)?,
                    s2k_mode: S2kMode::from_id(s2k_mode)?,
                    hash: HashAlgorithm::from_name(&s2k_digest_algo)?,
                    count: s2k_count,
                };
                Self::run_encrypt(&input, output, password, options, &prompt)
            }
            Commands::Decrypt { input, output, password, strict } => {
                let policy = if strict { IntegrityPolicy::Strict } else { IntegrityPolicy::Warn };
                Self::run_decrypt(&input, output, password, policy, &prompt)
            }
            Commands::List { input } => Self::run_list(&input),
        }
    }

    fn run_encrypt(input_path: &str, output_path: Option<String>, password: Option<String>, options: EncryptOptions, prompt: &Prompt) -> Result<()> {
        let input = File::new(input_path);
        let output = File::new(output_path.map_or_else(|| input.output_path(ProcessorMode::Encrypt), PathBuf::from));
        let password = Self::get_password(password, prompt, Processing::Encryption)?;

        Processor::encrypt_file(&input, &output, &password, options).with_context(|| format!("{} failed: {}", Processing::Encryption, input.path().display()))?;

        crate::ui::show_success(ProcessorMode::Encrypt, output.path());
        Ok(())
    }

    fn run_decrypt(input_path: &str, output_path: Option<String>, password: Option<String>, policy: IntegrityPolicy, prompt: &Prompt) -> Result<()> {
        let input = File::new(input_path);
        let data = input.read_all()?;
        let decryptor = Decryptor::parse(&data).with_context(|| format!("failed to parse {}", input.path().display()))?;
        let password = Self::get_password(password, prompt, Processing::Decryption)?;

        let output = output_path.map(PathBuf::from);
        let (path, decrypted) = Processor::decrypt_parsed(&input, &decryptor, output.as_deref(), &password, policy).map_err(|error| {
            let hint = if error.downcast_ref::<Error>().is_some_and(Error::is_key_mismatch) { " (wrong passphrase?)" } else { "" };
            error.context(format!("{} failed{hint}: {}", Processing::Decryption, input.path().display()))
        })?;

        crate::ui::show_report(&decrypted);
        crate::ui::show_success(ProcessorMode::Decrypt, &path);
        Ok(())
    }

    fn run_list(input_path: &str) -> Result<()> {
        let input = File::new(input_path);
        let data = input.read_all()?;
        let packets = Deserializer::parse(&data).with_context(|| format!("failed to parse {}", input.path().display()))?;
        crate::ui::show_packets(&packets);
        Ok(())
    }

    fn get_password(password: Option<String>, prompt: &Prompt, processing: Processing) -> Result<Secret> {
        match (password, processing) {
            (Some(password), _) => prompt.validate(password),
            (None, Processing::Encryption) => prompt.prompt_encryption_password(),
            (None, Processing::Decryption) => prompt.prompt_decryption_password(),
        }
    }
}
