use std::fmt::Write as _;

use serde::Serialize;
use weather_core::{
    CurrentWeather, ForecastDay, HourlyForecast, Location, TemperatureUnit, TimelineInterval,
    WeatherReport, classify_rain_intensity, compass_direction, format_date, format_temperature,
    format_time, weather_code,
};

/// Renders results either as text or as pretty JSON on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub unit: TemperatureUnit,
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    pub fn current(&self, current: &CurrentWeather) -> anyhow::Result<()> {
        self.emit(current, || self.render_current(current))
    }

    pub fn forecast(&self, days: &[ForecastDay]) -> anyhow::Result<()> {
        self.emit(days, || self.render_forecast(days))
    }

    pub fn hourly(&self, hours: &[HourlyForecast]) -> anyhow::Result<()> {
        self.emit(hours, || self.render_hourly(hours))
    }

    pub fn report(&self, report: &WeatherReport) -> anyhow::Result<()> {
        self.emit(report, || {
            format!(
                "{}\nDaily forecast\n{}\nHourly forecast\n{}",
                self.render_current(&report.current),
                self.render_forecast(&report.forecast),
                self.render_hourly(&report.hourly),
            )
        })
    }

    pub fn locations(&self, locations: &[Location]) -> anyhow::Result<()> {
        self.emit(locations, || render_locations(locations))
    }

    pub fn conditions(
        &self,
        location: &Location,
        interval: &TimelineInterval,
    ) -> anyhow::Result<()> {
        let rain = classify_rain_intensity(interval.values.rain_intensity);
        let value = serde_json::json!({
            "location": location,
            "interval": interval,
            "rain": rain,
        });
        self.emit(&value, || self.render_conditions(location, interval))
    }

    fn temp(&self, celsius: f64) -> String {
        format_temperature(celsius, self.unit)
    }

    pub fn render_current(&self, c: &CurrentWeather) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} (code {})", c.weather_description, c.weather_code);
        let _ = writeln!(
            out,
            "Temperature: {} (feels like {})",
            self.temp(c.temperature),
            self.temp(c.feels_like)
        );
        let _ = writeln!(
            out,
            "Wind:        {} km/h from {} ({}°)",
            c.wind_speed,
            compass_direction(c.wind_direction),
            c.wind_direction
        );
        let _ = writeln!(out, "Sunrise:     {}", format_time(&c.sunrise));
        let _ = writeln!(out, "Sunset:      {}", format_time(&c.sunset));
        out
    }

    pub fn render_forecast(&self, days: &[ForecastDay]) -> String {
        let mut out = String::new();
        for day in days {
            let _ = writeln!(
                out,
                "{:<11}  max {:>5}  min {:>5}  rain {:>4}  {}",
                format_date(&day.date),
                self.temp(day.temp_max),
                self.temp(day.temp_min),
                percent(day.precipitation_probability),
                weather_code::describe(day.weather_code),
            );
        }
        out
    }

    pub fn render_hourly(&self, hours: &[HourlyForecast]) -> String {
        let mut out = String::new();
        for hour in hours {
            let _ = writeln!(
                out,
                "{} {}  {:>5}  rain {:>4}  wind {:.1} km/h",
                format_date(hour.time.split('T').next().unwrap_or_default()),
                format_time(&hour.time),
                self.temp(hour.temperature),
                percent(hour.precipitation_probability),
                hour.wind_speed,
            );
        }
        out
    }

    pub fn render_conditions(&self, location: &Location, interval: &TimelineInterval) -> String {
        let v = &interval.values;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}, {} at {} UTC",
            location.city,
            location.country,
            interval.start_time.format("%a, %b %-d %H:%M")
        );
        let _ = writeln!(
            out,
            "Temperature: {} (feels like {})",
            self.temp(v.temperature),
            self.temp(v.temperature_apparent)
        );
        let _ = writeln!(out, "Humidity:    {}%", v.humidity);
        let _ = writeln!(
            out,
            "Wind:        {} m/s from {} ({}°)",
            v.wind_speed,
            compass_direction(v.wind_direction),
            v.wind_direction
        );
        let _ = writeln!(out, "UV index:    {}", v.uv_index);
        let _ = writeln!(out, "Rain:        {}", classify_rain_intensity(v.rain_intensity));
        out
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |p| format!("{p}%"))
}

fn render_locations(locations: &[Location]) -> String {
    let mut out = String::new();
    for location in locations {
        let _ = writeln!(
            out,
            "{:>2}  {}, {}  ({})",
            location.id, location.city, location.country, location.coordinates
        );
    }
    out
}
