//! Output formatting for a decoded reading

use crate::device::Reading;
use serde::Serialize;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable five-line report
    #[default]
    Text,
    /// Every decoded field as JSON
    Json,
}

/// Five-line report: collector and water temperature, pump, time, status
pub fn render_text(reading: &Reading) -> String {
    let (hours, minutes) = reading.clock();
    format!(
        "\n\
         Collector Temperature : {:.1} \u{b0}C\n\
         Water     Temperature : {:.1} \u{b0}C\n\
         Pump                  : {}%\n\
         Time                  : {}:{:02}\n\
         Status                : {}\n\n",
        reading.collector_temperature(),
        reading.water_temperature(),
        reading.pump_speed_1,
        hours,
        minutes,
        reading.status,
    )
}

#[derive(Debug, Serialize)]
struct ReadingJson {
    temperatures: [f64; 5],
    pump_speed_1: i8,
    operating_hours_1: u16,
    pump_speed_2: i8,
    operating_hours_2: u16,
    unit_type: u8,
    system: u8,
    error_mask: u16,
    defective_sensors: Vec<usize>,
    system_time_minutes: u16,
    time: String,
    status: u32,
    heat_quantity_wh: u32,
    firmware_version: f64,
    flow_rate_lph: u16,
}

impl From<&Reading> for ReadingJson {
    fn from(r: &Reading) -> Self {
        let (hours, minutes) = r.clock();
        Self {
            temperatures: r.temperatures(),
            pump_speed_1: r.pump_speed_1,
            operating_hours_1: r.operating_hours_1,
            pump_speed_2: r.pump_speed_2,
            operating_hours_2: r.operating_hours_2,
            unit_type: r.unit_type,
            system: r.system,
            error_mask: r.error_mask,
            // 1-based sensor numbers
            defective_sensors: (0..4).filter(|&i| r.sensor_defective(i)).map(|i| i + 1).collect(),
            system_time_minutes: r.system_time,
            time: format!("{}:{:02}", hours, minutes),
            status: r.status,
            heat_quantity_wh: r.heat_quantity,
            firmware_version: r.firmware_version(),
            flow_rate_lph: r.flow_rate,
        }
    }
}

/// All decoded fields as pretty-printed JSON
pub fn render_json(reading: &Reading) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReadingJson::from(reading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::deltasol_cs4::{decode, SAMPLE_PAYLOAD};

    #[test]
    fn test_render_text_sample() {
        let reading = decode(&SAMPLE_PAYLOAD).unwrap();
        let text = render_text(&reading);

        assert_eq!(
            text,
            "\nCollector Temperature : 50.5 °C\n\
             Water     Temperature : 29.5 °C\n\
             Pump                  : 100%\n\
             Time                  : 8:54\n\
             Status                : 0\n\n"
        );
    }

    #[test]
    fn test_render_text_pads_minutes() {
        let mut payload = SAMPLE_PAYLOAD;
        payload[22..24].copy_from_slice(&65u16.to_le_bytes());
        let text = render_text(&decode(&payload).unwrap());
        assert!(text.contains("Time                  : 1:05\n"));
    }

    #[test]
    fn test_render_json_fields() {
        let reading = decode(&SAMPLE_PAYLOAD).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&reading).unwrap()).unwrap();

        assert_eq!(json["temperatures"][0], 50.5);
        assert_eq!(json["temperatures"][1], 29.5);
        assert_eq!(json["pump_speed_1"], 100);
        assert_eq!(json["time"], "8:54");
        assert_eq!(json["system_time_minutes"], 534);
        assert_eq!(json["status"], 0);
        assert_eq!(json["heat_quantity_wh"], 12345);
        assert_eq!(json["defective_sensors"], serde_json::json!([]));
    }
}
