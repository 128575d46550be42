use std::fmt;

/// Strip-chart calibration, fixed after setup.
///
/// `tick_size_px` is the pixel spacing between gridlines; `time_tick_value`
/// and `voltage_tick_value` are the physical units one gridline spans. The
/// defaults reproduce a standard ECG strip: 10 px ticks worth 0.04 s / 0.1 mV,
/// a ±5 mV visible range, and a 6 s window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    tick_size_px: u32,
    time_tick_value: f64,
    voltage_tick_value: f32,
    max_voltage_range: f32,
    visible_time_window: f64,
}

/// Invalid plot calibration. Fatal: reject before any GPU setup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveTickSize,
    NonPositiveTimeTick(f64),
    NonPositiveVoltageTick(f32),
    NonPositiveVoltageRange(f32),
    NonPositiveTimeWindow(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveTickSize => {
                write!(f, "tick size must be at least one pixel")
            }
            ConfigError::NonPositiveTimeTick(v) => {
                write!(f, "time tick value must be positive, got {v}")
            }
            ConfigError::NonPositiveVoltageTick(v) => {
                write!(f, "voltage tick value must be positive, got {v}")
            }
            ConfigError::NonPositiveVoltageRange(v) => {
                write!(f, "voltage range must be positive, got {v}")
            }
            ConfigError::NonPositiveTimeWindow(v) => {
                write!(f, "visible time window must be positive, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl PlotConfig {
    pub fn new(
        tick_size_px: u32,
        time_tick_value: f64,
        voltage_tick_value: f32,
        max_voltage_range: f32,
        visible_time_window: f64,
    ) -> Result<Self, ConfigError> {
        if tick_size_px == 0 {
            return Err(ConfigError::NonPositiveTickSize);
        }
        if !(time_tick_value > 0.0) {
            return Err(ConfigError::NonPositiveTimeTick(time_tick_value));
        }
        if !(voltage_tick_value > 0.0) {
            return Err(ConfigError::NonPositiveVoltageTick(voltage_tick_value));
        }
        if !(max_voltage_range > 0.0) {
            return Err(ConfigError::NonPositiveVoltageRange(max_voltage_range));
        }
        if !(visible_time_window > 0.0) {
            return Err(ConfigError::NonPositiveTimeWindow(visible_time_window));
        }
        Ok(Self {
            tick_size_px,
            time_tick_value,
            voltage_tick_value,
            max_voltage_range,
            visible_time_window,
        })
    }

    #[inline]
    pub fn tick_size_px(&self) -> u32 {
        self.tick_size_px
    }

    /// Seconds per time gridline.
    #[inline]
    pub fn time_tick_value(&self) -> f64 {
        self.time_tick_value
    }

    /// Physical units per voltage gridline.
    #[inline]
    pub fn voltage_tick_value(&self) -> f32 {
        self.voltage_tick_value
    }

    #[inline]
    pub fn max_voltage_range(&self) -> f32 {
        self.max_voltage_range
    }

    /// Seconds of history the trace keeps and draws.
    #[inline]
    pub fn visible_time_window(&self) -> f64 {
        self.visible_time_window
    }

    /// NDC distance between adjacent time gridlines at `viewport_width` px.
    ///
    /// Shared by the time grid and the trace x-mapping; using the same ratio
    /// in both places is what keeps one gridline worth exactly
    /// `time_tick_value` seconds of data.
    pub fn tick_step_x(&self, viewport_width: u32) -> f32 {
        let pixel_weight_x = 2.0 / viewport_width as f32;
        self.tick_size_px as f32 * pixel_weight_x
    }

    /// Pixel span the symmetric ±`max_voltage_range` scale occupies.
    pub fn reference_height_px(&self) -> f32 {
        2.0 * (self.max_voltage_range / self.voltage_tick_value) * self.tick_size_px as f32
    }

    /// Gridline count for the voltage axis, ±range inclusive.
    pub fn voltage_tick_count(&self) -> u32 {
        (2.0 * self.max_voltage_range / self.voltage_tick_value).round() as u32 + 1
    }

    /// Maps a value to NDC y: `+max ↦ +1`, `-max ↦ -1`, out-of-range values
    /// clip rather than leaving the rasterizer's range.
    #[inline]
    pub fn volts_to_ndc(&self, value: f32) -> f32 {
        (value / self.max_voltage_range).clamp(-1.0, 1.0)
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            tick_size_px: 10,
            time_tick_value: 0.04,
            voltage_tick_value: 0.1,
            max_voltage_range: 5.0,
            visible_time_window: 6.0,
        }
    }
}
