/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis over exactly `[min, max]` with "nice number" ticks inside it.
    pub fn linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let (min, max) = if (max - min).abs() < 1e-15 { (min, min + 1.0) } else { (min, max) };
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        let eps = step * 1e-6;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let first = (min / step - 1e-9).ceil() as i64;
        let mut k = first;
        loop {
            let v = k as f64 * step;
            if v > max + eps {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
            k += 1;
        }

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let mut k = (min / minor_step - 1e-9).ceil() as i64;
        loop {
            let v = k as f64 * minor_step;
            if v > max + eps {
                break;
            }
            if !ticks.iter().any(|t| (t - v).abs() < minor_step * 0.01) {
                minor.push(v);
            }
            k += 1;
        }

        Self {
            min,
            max,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    if decimals == 0 {
        // Avoid "-0"
        let v = if value.abs() < step * 0.01 { 0.0 } else { value };
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_requested_range() {
        let ax = Axis::linear(0.0, 100.0, 6);
        assert_eq!((ax.min, ax.max), (0.0, 100.0));
        assert_eq!(ax.tick_labels, ["0", "20", "40", "60", "80", "100"]);
        assert!(!ax.minor_ticks.is_empty());
        assert!(ax.minor_ticks.iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn ticks_stay_inside_odd_range() {
        let ax = Axis::linear(0.0, 143.0, 5);
        assert_eq!(ax.max, 143.0);
        assert!(ax.tick_positions.iter().all(|&t| t <= 143.0));
        assert_eq!(ax.tick_positions.first(), Some(&0.0));
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::linear(0.0, 100.0, 5);
        assert!((ax.data_to_pixel(50.0, 0.0, 500.0) - 250.0).abs() < 1e-9);
        // Inverted pixel range (y axes).
        assert!((ax.data_to_pixel(0.0, 400.0, 100.0) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_labels() {
        let ax = Axis::linear(0.0, 1.0, 6);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0.0"));
        assert_eq!(ax.tick_labels.last().map(String::as_str), Some("1.0"));
    }
}
