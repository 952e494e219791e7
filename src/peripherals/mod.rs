//! PineTime board support

use embassy_nrf::config::{Config, Debug, HfclkSource, LfclkSource};

pub(super) mod display;

/// HAL settings for the PineTime board
pub fn board_config() -> Config {
    // `Config` is non-exhaustive, start from the HAL defaults
    let mut config = Config::default();

    // Both crystals are populated on the board
    config.hfclk_source = HfclkSource::ExternalXtal;
    config.lfclk_source = LfclkSource::ExternalXtal;

    // DC/DC converter for REG1, much lower current draw than the LDO
    config.dcdc.reg1 = true;

    // Keep SWD available for the RTT logger
    config.debug = Debug::Allowed;

    config
}
