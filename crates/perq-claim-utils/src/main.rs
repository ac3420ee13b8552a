use color_eyre::eyre::Result;
use perq_claim_utils::{
    cli::{
        self,
        Command,
    },
    proof_generator,
    proof_verifier,
    root_computer,
};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    match cli::get() {
        Command::ComputeRoot(args) => root_computer::run(&args),
        Command::GenerateProof(args) => proof_generator::run(args),
        Command::VerifyProof(args) => proof_verifier::run(args),
    }
}
