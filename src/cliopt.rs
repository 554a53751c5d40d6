use std::path::PathBuf;

use structopt::StructOpt;

use crate::error::Result;
use crate::output::encoder::{
    Encoder, InfluxEncoder, JsonEncoder, MsgpackEncoder, PrometheusEncoder, RemoteWriteEncoder,
    TextEncoder,
};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cmetrics",
    about = "Render concatenated cmetrics wire records as Prometheus, InfluxDB and more"
)]
pub struct CliOpt {
    /// prometheus, influx, remote-write, text, json or msgpack
    #[structopt(
        long = "format",
        short = "f",
        default_value = "prometheus",
        parse(try_from_str = parse_format)
    )]
    pub format: Format,

    /// Omit timestamps from the Prometheus exposition output.
    #[structopt(long = "no-timestamp")]
    pub no_timestamp: bool,

    #[structopt(long = "verbose", short = "v")]
    pub verbose: bool,

    /// File with the records; stdin when missing.
    #[structopt(parse(from_os_str))]
    pub input: Option<PathBuf>,
}

impl CliOpt {
    pub fn encoder(&self) -> Box<dyn Encoder> {
        match self.format {
            Format::Prometheus => Box::new(PrometheusEncoder::new(!self.no_timestamp)),
            Format::Influx => Box::new(InfluxEncoder::new()),
            Format::RemoteWrite => Box::new(RemoteWriteEncoder::new()),
            Format::Text => Box::new(TextEncoder::new()),
            Format::Json => Box::new(JsonEncoder::new()),
            Format::Msgpack => Box::new(MsgpackEncoder::new()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    Prometheus,
    Influx,
    RemoteWrite,
    Text,
    Json,
    Msgpack,
}

fn parse_format(s: &str) -> Result<Format> {
    match s {
        "prometheus" | "prom" => Ok(Format::Prometheus),
        "influx" | "influxdb" => Ok(Format::Influx),
        "remote-write" | "remote_write" => Ok(Format::RemoteWrite),
        "text" | "debug" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        "msgpack" => Ok(Format::Msgpack),
        _ => Err(format!("unknown output format '{}'", s).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cliopt_defaults() {
        let opt = CliOpt::from_iter(&["cmetrics"]);
        assert_eq!(opt.format, Format::Prometheus);
        assert!(!opt.no_timestamp);
        assert!(opt.input.is_none());
    }

    #[test]
    fn test_cliopt_format() {
        let opt = CliOpt::from_iter(&["cmetrics", "-f", "influx", "records.bin"]);
        assert_eq!(opt.format, Format::Influx);
        assert_eq!(opt.input, Some(PathBuf::from("records.bin")));

        assert!(CliOpt::from_iter_safe(&["cmetrics", "--format", "xml"]).is_err());
    }
}
