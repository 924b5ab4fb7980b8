use simkit_apdu_transport_pcsc::{
    ConnectStrategy, PcscConfig, PcscDeviceManager, PcscError, PcscTransport,
};
use tracing::info;

/// Connect to the named reader, or to the first one holding a card
pub fn connect(
    manager: &PcscDeviceManager,
    reader_name: Option<&str>,
) -> Result<PcscTransport, PcscError> {
    let strategy = reader_name.map_or(ConnectStrategy::AnyCard, |name| {
        ConnectStrategy::Reader(name.to_string())
    });

    let transport = manager.connect_strategy(strategy, PcscConfig::default())?;
    info!("Using reader: {}", transport.reader_name());
    Ok(transport)
}
