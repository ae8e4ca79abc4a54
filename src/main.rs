// Loads the dashboard artifact directory, rebuilds the pairwise pollutant
// Spearman grid from the country aggregates, and writes the coefficient
// matrix as TSV.

use std::{env, error::Error, time::Instant};

use aircorr::artifacts::DashboardData;
use aircorr::dataset::Pollutant;
use aircorr::grid::{correlation_grid, strongest_pair};
use aircorr::significance::approx_p_value;
use aircorr::stats::{global_scalar, StatKind, YearFilter};
use csv::WriterBuilder;

fn parse_args() -> Result<(String, Option<usize>, bool), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("Usage: aircorr <data_dir> [num_threads] [--time]\n\
                    data_dir: directory containing the dashboard JSON artifacts\n\
                    num_threads: number of threads to use (default: all available)\n\
                    --time: enable detailed timing output"
            .into());
    }

    let mut num_threads = None;
    let mut time_tracking = false;
    for arg in args.iter().skip(2) {
        if arg == "--time" {
            time_tracking = true;
        } else if let Ok(threads) = arg.parse::<usize>() {
            num_threads = Some(threads);
        } else {
            return Err(format!("Unknown argument: {}", arg).into());
        }
    }

    Ok((args[1].clone(), num_threads, time_tracking))
}

fn main() -> Result<(), Box<dyn Error>> {
    let (data_dir, num_threads, time_tracking) = parse_args()?;

    if let Some(threads) = num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| format!("Failed to set thread pool: {}", e))?;
        println!("Using {} threads.", threads);
    }

    let load_start = if time_tracking { Some(Instant::now()) } else { None };
    let data = DashboardData::load_dir(&data_dir)?;
    let load_duration = load_start.map(|start| start.elapsed());

    println!(
        "Loaded {} countries, {} measurement histories, {} indicator correlations.",
        data.countries.len(),
        data.pollution.len(),
        data.correlations.len()
    );

    let calc_start = if time_tracking { Some(Instant::now()) } else { None };
    let grid = correlation_grid(&data.countries);
    let calc_duration = calc_start.map(|start| start.elapsed());

    if let Some(strongest) = strongest_pair(&grid) {
        let r = strongest.coefficient.unwrap_or(0.0);
        println!(
            "Strongest pair: {} / {} (rho = {:.3}, n = {}, p ~ {:.4}{})",
            strongest.pollutant_a.info().label,
            strongest.pollutant_b.info().label,
            r,
            strongest.n_observations,
            approx_p_value(r, strongest.n_observations),
            if strongest.significant { ", significant" } else { "" }
        );
    }

    println!("Global medians across all years:");
    for pollutant in Pollutant::ALL {
        let value = global_scalar(&data.pollution, pollutant, YearFilter::All, StatKind::Median);
        match value {
            Some(v) => println!("  {:<5} {:>10.2} {}", pollutant, v, pollutant.info().unit),
            None => println!("  {:<5} {:>10}", pollutant, "n/a"),
        }
    }

    // TSV matrix, pollutants as both axes
    let output_start = if time_tracking { Some(Instant::now()) } else { None };
    let output_path = "pollutant_spearman.tsv";
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_path(output_path)?;

    wtr.write_record(
        std::iter::once(String::new()).chain(Pollutant::ALL.iter().map(|p| p.to_string())),
    )?;
    let k = Pollutant::ALL.len();
    for (row_idx, pollutant) in Pollutant::ALL.iter().enumerate() {
        let cells = grid[row_idx * k..(row_idx + 1) * k].iter().map(|c| {
            c.coefficient
                .map(|r| r.to_string())
                .unwrap_or_else(|| "NA".to_string())
        });
        wtr.write_record(std::iter::once(pollutant.to_string()).chain(cells))?;
    }
    wtr.flush()?;
    let output_duration = output_start.map(|start| start.elapsed());

    println!("Correlation matrix written to {}", output_path);

    if time_tracking {
        if let (Some(load_dur), Some(calc_dur), Some(output_dur)) =
            (load_duration, calc_duration, output_duration)
        {
            let total = load_dur + calc_dur + output_dur;
            println!("Artifact loading:        {:8.3} seconds", load_dur.as_secs_f64());
            println!("Correlation calculation: {:8.3} seconds", calc_dur.as_secs_f64());
            println!("Output writing:          {:8.3} seconds", output_dur.as_secs_f64());
            println!("Total time:              {:8.3} seconds", total.as_secs_f64());
        }
    }

    Ok(())
}
