//! Commands that talk to the SIM

use simkit_apdu_transport_pcsc::PcscTransport;
use simkit_sim::{Chv, Operation, Output, Pin, Rand, Sim, SimCard};
use std::error::Error;
use tracing::{debug, info};

use crate::utils::display;

type PcscSim = Sim<SimCard<PcscTransport>>;

fn open_sim(transport: PcscTransport, pin: Option<&Pin>) -> Result<PcscSim, simkit_sim::Error> {
    let mut sim = Sim::new(SimCard::new(transport));
    if let Some(pin) = pin {
        sim.verify_chv(Chv::Chv1, pin)?;
        info!("CHV1 verified");
    }
    Ok(sim)
}

/// Run a dispatch table entry and print its result
pub fn operation_command(
    transport: PcscTransport,
    operation: &Operation,
    pin: Option<&Pin>,
) -> Result<(), Box<dyn Error>> {
    let mut sim = open_sim(transport, pin)?;
    debug!(parameter = %operation.parameter(), "Running operation");
    let output = operation.execute(&mut sim)?;

    match &output {
        Output::Report(report) => {
            println!("{}", display::section_title("SIM card"));
            println!("{}", display::key_value_box(&report.entries()));
        }
        Output::Authentication(auth) => {
            println!("{}", display::section_title("GSM authentication"));
            println!(
                "{}",
                display::key_value_box(&[
                    ("SRES", hex::encode_upper(auth.sres)),
                    ("Kc", hex::encode_upper(auth.kc)),
                ])
            );
        }
        Output::Bytes(_) => {
            if matches!(
                operation,
                Operation::WriteKc(_) | Operation::WriteLocationInfo(_)
            ) {
                println!(
                    "{}",
                    display::success(&format!("{} written", operation.parameter()))
                );
            }
            println!("{output}");
        }
    }

    if let Some(bytes) = output.to_bytes() {
        println!("{}", hex::encode(bytes));
    }

    Ok(())
}

/// Run the GSM algorithm and print a strongSwan `triplets.dat` line
pub fn triplet_command(
    transport: PcscTransport,
    rand: Rand,
    pin: Option<&Pin>,
) -> Result<(), Box<dyn Error>> {
    let mut sim = open_sim(transport, pin)?;
    let triplet = sim.gsm_triplet(rand)?;
    println!("{}", triplet.to_strongswan_line());
    Ok(())
}
