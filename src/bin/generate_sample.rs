use std::fs::File;
use std::io::{BufWriter, Write};

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Helsinki;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Seasonal daily mean for southern Finland: coldest in late January.
fn seasonal_mean(date: NaiveDate) -> f64 {
    let phase = (date.ordinal() as f64 - 25.0) / 365.25 * 2.0 * std::f64::consts::PI;
    5.5 - 11.5 * phase.cos()
}

/// Hourly energy export: `;` fields, `,` decimals, `+02:00`/`+03:00` offsets.
/// The daily average temperature is repeated on every hour of its day, and
/// roughly one hour in 500 has no reading.
fn write_energy_year(year: i32, rng: &mut SimpleRng) -> std::io::Result<String> {
    let path = format!("sample_{year}.csv");
    let mut out = BufWriter::new(File::create(&path)?);
    writeln!(
        out,
        "Time;Consumption (net) kWh;Production (net) kWh;Daily average temperature"
    )?;

    let start = Utc
        .with_ymd_and_hms(year - 1, 12, 31, 22, 0, 0)
        .single()
        .expect("valid start instant");
    let mut daily_temp = None;
    let mut current_day = None;
    let mut hour = start;
    loop {
        let local = hour.with_timezone(&Helsinki);
        if local.year() != year {
            break;
        }
        let day = local.date_naive();
        if current_day != Some(day) {
            current_day = Some(day);
            daily_temp = Some(rng.gauss(seasonal_mean(day), 3.0));
        }

        let consumption = (1.2 + 0.4 * rng.gauss(0.0, 1.0)).max(0.05);
        let temp = if rng.next_f64() < 0.002 {
            String::new()
        } else {
            format!("{:.1}", daily_temp.unwrap_or_default()).replace('.', ",")
        };
        writeln!(
            out,
            "{};{};0,000;{}",
            local.format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
            format!("{consumption:.3}").replace('.', ","),
            temp
        )?;
        hour += Duration::hours(1);
    }
    out.flush()?;
    Ok(path)
}

/// Weather-service file: `,` fields, `.` decimals, naive local timestamps.
fn write_weather_year(year: i32, rng: &mut SimpleRng) -> std::io::Result<String> {
    let path = format!("sample_{year}_weather.csv");
    let mut out = BufWriter::new(File::create(&path)?);
    writeln!(out, "Observation station,Time,Air temperature")?;

    let mut day = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date");
    while day.year() == year {
        let mean = seasonal_mean(day);
        for h in 0..24 {
            let diurnal = -2.0 * ((h as f64 - 3.0) / 24.0 * 2.0 * std::f64::consts::PI).cos();
            let reading = rng.gauss(mean + diurnal, 0.8);
            writeln!(out, "Helsinki Kaisaniemi,{day} {h:02}:00:00,{reading:.1}")?;
        }
        day += Duration::days(1);
    }
    out.flush()?;
    Ok(path)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    for year in [2023, 2024] {
        let energy = write_energy_year(year, &mut rng).expect("Failed to write energy sample");
        println!("Wrote {energy}");
    }
    let weather = write_weather_year(2024, &mut rng).expect("Failed to write weather sample");
    println!("Wrote {weather}");
}
