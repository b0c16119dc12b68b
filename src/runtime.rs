// Runtime executor: drives a chart from a request and an optional script

use crate::config::ChartOptions;
use crate::controller::Trellis;
use crate::data::Dataset;
use crate::error::Result;
use crate::parser::ast::{Command, Script};
use crate::render::RenderSink;
use crate::resolve::{AxisConfig, AxisField};
use crate::sort::SortOrder;

/// What the caller asked for. Any missing column is filled in from the data.
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    pub numeric: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub order: Option<SortOrder>,
    pub script: Option<Script>,
    pub transpose: bool,
}

/// Build a chart, configure it and play the request against it. The chart is
/// returned still live so the caller can read the sink before destroying it.
pub fn run<S: RenderSink>(
    data: Dataset,
    request: &ChartRequest,
    options: ChartOptions,
    sink: S,
) -> Result<Trellis<S>> {
    let axes = initial_axes(&data, request)?;
    let mut chart = Trellis::new(data, options, sink);
    chart.apply(axes)?;

    if let Some(script) = &request.script {
        run_script(&mut chart, script)?;
    }
    if request.transpose {
        chart.transpose()?;
    }
    Ok(chart)
}

/// Apply each command of `script` in order, stopping at the first failure.
pub fn run_script<S: RenderSink>(chart: &mut Trellis<S>, script: &Script) -> Result<()> {
    for command in &script.commands {
        log::debug!("script: {:?}", command);
        match command {
            Command::Axes {
                numeric,
                x,
                y,
                order,
            } => chart.set_axes(numeric, x, y, *order)?,
            Command::Transpose => chart.transpose()?,
            Command::Rerender => chart.rerender()?,
        }
    }
    Ok(())
}

fn initial_axes(data: &Dataset, request: &ChartRequest) -> Result<AxisConfig> {
    if let (Some(numeric), Some(x), Some(y)) = (&request.numeric, &request.x, &request.y) {
        return Ok(AxisConfig::new(
            numeric.as_str(),
            x.as_str(),
            y.as_str(),
            request.order,
        ));
    }

    let mut axes = AxisConfig::suggest(data)?;
    let overrides = [
        (AxisField::Numeric, &request.numeric),
        (AxisField::Y, &request.y),
        (AxisField::X, &request.x),
    ];
    for (field, column) in overrides {
        if let Some(column) = column {
            axes = axes.with_field(data, field, column);
        }
    }
    axes.order = request.order.unwrap_or_default();
    log::info!(
        "suggested axes numeric={} x={} y={}",
        axes.numeric,
        axes.x,
        axes.y
    );
    Ok(axes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrellisError;
    use crate::parser::parse_script;
    use crate::render::RecordingSink;

    fn sales() -> Dataset {
        let csv = "amount,region,product\n10,A,X\n20,A,Y\n5,B,X\n";
        Dataset::from_csv(csv.as_bytes()).unwrap()
    }

    fn measure(s: &str) -> f64 {
        7.0 * s.len() as f64
    }

    #[test]
    fn test_initial_axes_suggested() {
        let axes = initial_axes(&sales(), &ChartRequest::default()).unwrap();
        assert_eq!(axes, AxisConfig::new("amount", "product", "region", None));
    }

    #[test]
    fn test_initial_axes_override_moves_collision() {
        let request = ChartRequest {
            y: Some("product".to_string()),
            order: Some(SortOrder::Alpha),
            ..Default::default()
        };
        let axes = initial_axes(&sales(), &request).unwrap();
        assert_eq!(axes.y, "product");
        assert_eq!(axes.x, "region");
        assert_eq!(axes.order, SortOrder::Alpha);
    }

    #[test]
    fn test_run_script_sequence() {
        let data = sales();
        let mut chart = Trellis::new(data, ChartOptions::default(), RecordingSink::new())
            .with_measurer(measure);
        let (_, script) =
            parse_script("axes(numeric: amount, x: region, y: product, order: asc) | transpose() | rerender()")
                .unwrap();
        run_script(&mut chart, &script).unwrap();

        let axes = chart.axes().unwrap();
        assert_eq!(axes.x, "product");
        assert_eq!(axes.y, "region");
        assert_eq!(axes.order, SortOrder::Asc);
        assert_eq!(chart.sink().frames.len(), 3);
    }

    #[test]
    fn test_run_script_stops_at_failure() {
        let mut chart = Trellis::new(sales(), ChartOptions::default(), RecordingSink::new())
            .with_measurer(measure);
        let (_, script) =
            parse_script("transpose() | axes(numeric: amount, x: region, y: product)").unwrap();
        assert!(matches!(
            run_script(&mut chart, &script),
            Err(TrellisError::NotConfigured)
        ));
        assert!(chart.sink().frames.is_empty());
    }
}
