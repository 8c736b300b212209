// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolarWatch.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Table rendering for terminal output.

use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use solarwatch_api::FleetComparison;
use solarwatch_types::{
    Client, DashboardSummary, EnergyData, EnergyFlow, Installation, InstallationDetail,
    InstallationStatus, IssueSeverity, MonthlyReport, PowerData, ProcessIssue, WeatherData,
};
use std::collections::BTreeMap;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formatter for human readable tables
pub struct TableFormatter;

fn header_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn time(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIME_FORMAT).to_string()
}

fn status_cell(status: InstallationStatus) -> Cell {
    let color = match status {
        InstallationStatus::Active => Color::Green,
        InstallationStatus::Inactive => Color::Grey,
        InstallationStatus::Maintenance => Color::Yellow,
        InstallationStatus::Error => Color::Red,
    };
    Cell::new(status).fg(color)
}

impl TableFormatter {
    /// One line saying which data path answered
    pub fn source_note(label: &str) -> String {
        if label == "fallback" {
            "⚠️  Backend unavailable, showing locally generated data".to_string()
        } else {
            "✅ Data from monitoring backend".to_string()
        }
    }

    /// Backend health line
    pub fn format_status(base_url: &str, reachable: bool) -> String {
        if reachable {
            format!("✅ Backend {base_url} is reachable")
        } else {
            format!("❌ Backend {base_url} is unreachable, every command will use local data")
        }
    }

    pub fn format_clients(clients: &[Client]) -> String {
        let mut table = header_table(&["Client", "Name", "Email", "Installations", "Power\n(kW)"]);

        for client in clients {
            let names: Vec<&str> = client.installations.iter().map(|i| i.name.as_str()).collect();
            table.add_row(vec![
                Cell::new(&client.id),
                Cell::new(&client.name),
                Cell::new(&client.email),
                Cell::new(names.join("\n")),
                Cell::new(format!("{:.1}", client.installed_power())),
            ]);
        }

        table.to_string()
    }

    pub fn format_installations(installations: &[Installation]) -> String {
        let mut table = header_table(&[
            "Installation",
            "Name",
            "Client",
            "Power\n(kW)",
            "Location",
            "Status",
            "Last Update",
        ]);

        for installation in installations {
            table.add_row(vec![
                Cell::new(&installation.id),
                Cell::new(&installation.name),
                Cell::new(&installation.client_id),
                Cell::new(format!("{:.1}", installation.installed_power)),
                Cell::new(&installation.location),
                status_cell(installation.status),
                Cell::new(time(installation.last_update)),
            ]);
        }

        table.to_string()
    }

    pub fn format_power(series: &[PowerData]) -> String {
        let mut table = header_table(&["Time (UTC)", "Power\n(kW)", "Irradiation\n(W/m²)"]);

        for point in series {
            table.add_row(vec![
                Cell::new(time(point.timestamp)),
                Cell::new(format!("{:.1}", point.power)),
                Cell::new(point.irradiation.map_or("-".to_string(), |v| format!("{v:.0}"))),
            ]);
        }

        let peak = series.iter().map(|p| p.power).fold(0.0_f64, f64::max);
        format!("{table}\n{} points, peak {peak:.1} kW\n", series.len())
    }

    /// One row per timestamp with a column per energy flow
    pub fn format_energy(series: &[EnergyData]) -> String {
        let mut rows: BTreeMap<DateTime<Utc>, [Option<f64>; 4]> = BTreeMap::new();
        for point in series {
            let column = EnergyFlow::all()
                .iter()
                .position(|f| *f == point.flow)
                .unwrap_or_default();
            rows.entry(point.timestamp).or_default()[column] = Some(point.energy);
        }

        let mut table = header_table(&[
            "Time (UTC)",
            "Production\n(kWh)",
            "Consumption\n(kWh)",
            "Export\n(kWh)",
            "Import\n(kWh)",
        ]);

        let mut totals = [0.0_f64; 4];
        for (timestamp, values) in &rows {
            let mut row = vec![Cell::new(time(*timestamp))];
            for (total, value) in totals.iter_mut().zip(values) {
                *total += value.unwrap_or_default();
                row.push(Cell::new(value.map_or("-".to_string(), |v| format!("{v:.1}"))));
            }
            table.add_row(row);
        }

        let mut total_row = vec![Cell::new("Total").add_attribute(Attribute::Bold)];
        total_row.extend(
            totals
                .iter()
                .map(|t| Cell::new(format!("{t:.1}")).add_attribute(Attribute::Bold)),
        );
        table.add_row(total_row);

        table.to_string()
    }

    pub fn format_weather(series: &[WeatherData]) -> String {
        let mut table = header_table(&[
            "Time (UTC)",
            "Temperature\n(°C)",
            "Humidity\n(%)",
            "Wind\n(m/s)",
            "Wind\n(km/h)",
            "Irradiation\n(W/m²)",
        ]);

        for reading in series {
            table.add_row(vec![
                Cell::new(time(reading.timestamp)),
                Cell::new(format!("{:.1}", reading.temperature)),
                Cell::new(format!("{:.0}", reading.humidity)),
                Cell::new(format!("{:.1}", reading.wind_speed)),
                Cell::new(format!("{:.1}", reading.wind_speed_kmh())),
                Cell::new(format!("{:.0}", reading.irradiation)),
            ]);
        }

        table.to_string()
    }

    pub fn format_detail(detail: &InstallationDetail) -> String {
        let installation = &detail.installation;
        let mut table = header_table(&["Metric", "Value"]);

        let rows = [
            ("Installation", format!("{} ({})", installation.name, installation.id)),
            ("Client", installation.client_name.clone()),
            ("Location", installation.location.clone()),
            ("Status", installation.status.to_string()),
            ("Installed power", format!("{:.1} kW", installation.installed_power)),
            ("Current power", format!("{:.1} kW", detail.current_power)),
            ("Self-consumption", format!("{:.1} kWh", detail.self_consumption)),
            ("Energy imported", format!("{:.1} kWh", detail.energy_imported)),
            ("Energy exported", format!("{:.1} kWh", detail.energy_exported)),
            ("Power history", format!("{} points", detail.power_history.len())),
            ("Weather history", format!("{} readings", detail.weather_data.len())),
        ];
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(value),
            ]);
        }

        table.to_string()
    }

    pub fn format_issues(issues: &[ProcessIssue]) -> String {
        let mut table = header_table(&[
            "Issue",
            "Installation",
            "Type",
            "Message",
            "Time (UTC)",
            "Resolved",
        ]);

        for issue in issues {
            let color = match issue.severity {
                IssueSeverity::Error => Color::Red,
                IssueSeverity::Warning => Color::Yellow,
                IssueSeverity::Info => Color::Blue,
            };
            table.add_row(vec![
                Cell::new(&issue.id),
                Cell::new(&issue.installation_id),
                Cell::new(issue.severity).fg(color),
                Cell::new(&issue.message),
                Cell::new(time(issue.timestamp)),
                Cell::new(if issue.resolved { "yes" } else { "no" }),
            ]);
        }

        let open = issues.iter().filter(|i| i.is_open()).count();
        format!("{table}\n{open} open of {}\n", issues.len())
    }

    pub fn format_report(report: &MonthlyReport) -> String {
        let mut table = header_table(&["Metric", "Value"]);

        let rows = [
            ("Installation", report.installation_id.clone()),
            ("Period", format!("{}-{}", report.year, report.month)),
            ("Production", format!("{:.1} kWh", report.total_production)),
            ("Consumption", format!("{:.1} kWh", report.total_consumption)),
            ("Export", format!("{:.1} kWh", report.total_export)),
            ("Import", format!("{:.1} kWh", report.total_import)),
            ("Self-consumed", format!("{:.1} kWh", report.self_consumed())),
            ("Efficiency", format!("{:.1} %", report.efficiency)),
        ];
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(value),
            ]);
        }

        table.to_string()
    }

    pub fn format_comparison(fleet: &FleetComparison) -> String {
        let mut table = header_table(&[
            "Installation",
            "Power\n(kW)",
            "Energy\n(kWh)",
            "Yield\n(kWh/kW)",
        ]);

        let best = fleet
            .comparisons
            .iter()
            .map(|c| c.energy_yield)
            .fold(f64::NEG_INFINITY, f64::max);

        for comparison in &fleet.comparisons {
            // Highlight best yield
            let name_cell = if comparison.energy_yield >= best {
                Cell::new(&comparison.installation_name)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new(&comparison.installation_name)
            };

            table.add_row(vec![
                name_cell,
                Cell::new(format!("{:.1}", comparison.total_power)),
                Cell::new(format!("{:.1}", comparison.total_energy)),
                Cell::new(format!("{:.2}", comparison.energy_yield)),
            ]);
        }

        let overview = &fleet.overview;
        format!(
            "{table}\nInstalled: {:.1} kW | Energy: {:.1} kWh | Average yield: {:.2} kWh/kW\n",
            overview.total_installed_power, overview.total_energy, overview.average_yield
        )
    }

    pub fn format_summary(summary: &DashboardSummary) -> String {
        let mut table = header_table(&["Metric", "Value"]);

        let rows = [
            ("Installations", summary.total_installations.to_string()),
            ("Active", summary.active_installations.to_string()),
            ("Installed power", format!("{:.1} kW", summary.total_installed_power)),
            ("Clients", summary.total_clients.to_string()),
            ("Open issues", summary.open_issues.to_string()),
            ("Critical issues", summary.critical_issues.to_string()),
        ];
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(value),
            ]);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_energy_pivot_and_totals() {
        let mut series = Vec::new();
        for hour in [10, 11] {
            for (flow, energy) in [
                (EnergyFlow::Production, 30.0),
                (EnergyFlow::Consumption, 12.0),
                (EnergyFlow::Export, 18.0),
                (EnergyFlow::Import, 0.0),
            ] {
                series.push(EnergyData {
                    timestamp: at(hour),
                    energy,
                    flow,
                });
            }
        }

        let output = TableFormatter::format_energy(&series);
        assert!(output.contains("2024-06-15 10:00"));
        assert!(output.contains("2024-06-15 11:00"));
        assert!(output.contains("Total"));
        assert!(output.contains("60.0"));
        assert!(output.contains("36.0"));
    }

    #[test]
    fn test_weather_shows_both_wind_units() {
        let output = TableFormatter::format_weather(&[WeatherData {
            timestamp: at(12),
            temperature: 21.4,
            humidity: 55.0,
            wind_speed: 10.0,
            irradiation: 480.0,
        }]);

        assert!(output.contains("10.0"));
        assert!(output.contains("36.0"));
    }

    #[test]
    fn test_power_summary_line() {
        let series = vec![
            PowerData {
                timestamp: at(5),
                power: 0.0,
                irradiation: Some(0.0),
            },
            PowerData {
                timestamp: at(12),
                power: 42.5,
                irradiation: None,
            },
        ];

        let output = TableFormatter::format_power(&series);
        assert!(output.contains("2 points, peak 42.5 kW"));
    }

    #[test]
    fn test_status_line() {
        let up = TableFormatter::format_status("http://localhost:8000", true);
        assert!(up.contains("http://localhost:8000 is reachable"));
        assert!(TableFormatter::format_status("http://x", false).contains("unreachable"));
    }

    #[test]
    fn test_source_note() {
        assert!(TableFormatter::source_note("fallback").contains("locally generated"));
        assert!(TableFormatter::source_note("remote").contains("backend"));
    }
}
