use std::fmt;

use ndarray::ArrayD;

use crate::container::model::DataContainer;
use crate::epoch::ts_to_dt;
use crate::math::StatsHelper;

/// Multi-line human readable summary of a container.
pub fn pformat(data: &DataContainer, verbose: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "== data container: system {} name {}  ==",
        data.system, data.name
    ));
    lines.push(format!("dimlabel    [{}]", data.dimlabel.join(", ")));

    if has_label(data, "time") {
        lines.push(format!(
            "timestamps  {:?} {} to {}",
            data.ts.shape(),
            endpoint(&data.ts, End::First, format_ts),
            endpoint(&data.ts, End::Last, format_ts)
        ));
    } else {
        lines.push(format!(
            "timestamp   {}",
            endpoint(&data.ts, End::First, format_ts)
        ));
    }

    if has_label(data, "range") {
        lines.push(format!(
            "range       {:?} {} to {}",
            data.rg.shape(),
            endpoint(&data.rg, End::First, |v| format!("{:7.2}", v)),
            endpoint(&data.rg, End::Last, |v| format!("{:7.2}", v))
        ));
    } else {
        lines.push(format!("range       {}", data.rg));
    }
    lines.push(format!("rg_unit     {}", data.rg_unit));

    lines.push(format!(
        "vel         {:?}  {} to {}",
        data.vel.shape(),
        endpoint(&data.vel, End::First, |v| format!("{:5.2}", v)),
        endpoint(&data.vel, End::Last, |v| format!("{:5.2}", v))
    ));

    match data.masked_var() {
        Ok(values) => {
            if let Some(stats) = StatsHelper::summarize(&values) {
                lines.push(format!(
                    "var         {:?}  min {:7.2e} max {:7.2e}",
                    data.var.shape(),
                    stats.min,
                    stats.max
                ));
                lines.push(format!(
                    "            mean {:7.2e} median {:7.2e}",
                    stats.mean, stats.median
                ));
            }
            lines.push(format!(
                "mask        {:4.1}%",
                StatsHelper::masked_percent(&values)
            ));
        }
        Err(err) => lines.push(format!("var         {:?}  {}", data.var.shape(), err)),
    }

    lines.push(format!("var_unit    {}", data.var_unit));
    lines.push(format!("var_lims    {:?}", data.var_lims));
    lines.push(format!("default colormap {}", data.colormap));

    if verbose {
        lines.push("filenames".to_string());
        for name in &data.filename {
            lines.push(format!("  {}", name));
        }
        lines.push("paraminfo".to_string());
        let info = serde_json::to_string_pretty(&data.paraminfo)
            .unwrap_or_else(|_| data.paraminfo.to_string());
        lines.extend(info.lines().map(|line| format!("  {}", line)));
    }

    lines.join("\n")
}

impl fmt::Display for DataContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pformat(self, false))
    }
}

#[derive(Clone, Copy)]
enum End {
    First,
    Last,
}

fn has_label(data: &DataContainer, label: &str) -> bool {
    data.dimlabel.iter().any(|l| l == label)
}

fn endpoint(axis: &ArrayD<f64>, end: End, render: impl Fn(f64) -> String) -> String {
    let value = match end {
        End::First => axis.iter().next(),
        End::Last => axis.iter().last(),
    };
    value.map_or_else(|| "empty".to_string(), |&v| render(v))
}

fn format_ts(ts: f64) -> String {
    ts_to_dt(ts).map_or_else(|_| format!("{}", ts), |dt| dt.to_string())
}
