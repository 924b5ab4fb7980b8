use clap::Args;
use simkit_sim::{Error, Operation, Parameter, Pin, Rand};

mod sim_operations;

pub use sim_operations::*;

/// Operation selection flags
#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// SIM mode: run the parameter without --write or --rand
    #[arg(short, long)]
    pub sim: bool,

    /// Kc|IMSI|LOCI|HPLMN|PLMN_SEL|ICCID|SPN|ACC|FPLMN|MSISDN|SMSP|PRINT_ALL|GSM_ALGO
    #[arg(short, long)]
    pub param: String,

    /// Bytes to write, as hex (Kc and LOCI only)
    #[arg(short, long, conflicts_with = "rand")]
    pub write: Option<String>,

    /// RAND for GSM_ALGO, 32 hex digits
    #[arg(short, long)]
    pub rand: Option<String>,

    /// Print a strongSwan triplets.dat line (GSM_ALGO only)
    #[arg(short = 'I', long, requires = "rand")]
    pub ipsec: bool,

    /// CHV1 to verify before the operation
    #[arg(long)]
    pub pin: Option<String>,
}

/// A validated request
#[derive(Debug)]
pub enum Request {
    /// Run a dispatch table entry
    Operation {
        /// Operation to run
        operation: Operation,
        /// CHV1 to verify first
        pin: Option<Pin>,
    },

    /// Build a strongSwan triplet
    Triplet {
        /// Challenge
        rand: Rand,
        /// CHV1 to verify first
        pin: Option<Pin>,
    },
}

impl SimArgs {
    /// Validate the flag combination without touching a card
    pub fn request(&self) -> Result<Request, Error> {
        let mut parameter: Parameter = self.param.parse()?;

        let argument = match (&self.write, &self.rand) {
            (Some(data), _) => {
                parameter = parameter
                    .write_variant()
                    .ok_or_else(|| Error::invalid_input(format!("{parameter} cannot be written")))?;
                Some(data.as_str())
            }
            (None, Some(rand)) => Some(rand.as_str()),
            (None, None) if self.sim => None,
            (None, None) => {
                return Err(Error::invalid_input(
                    "nothing to do: pass --sim to read, --write to update \
                     or --rand to authenticate",
                ));
            }
        };

        let pin = self.pin.as_deref().map(str::parse::<Pin>).transpose()?;
        let operation = Operation::new(parameter, argument)?;

        match operation {
            Operation::GsmAlgorithm(rand) if self.ipsec => Ok(Request::Triplet { rand, pin }),
            _ if self.ipsec => Err(Error::invalid_input("--ipsec only applies to GSM_ALGO")),
            operation => Ok(Request::Operation { operation, pin }),
        }
    }
}
