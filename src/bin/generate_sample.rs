//! Writes deterministic synthetic versions of the two input tables:
//!
//! * `LR/rect.csv` – headerless, 9 columns; box spans (metres) in columns
//!   4–6 and efficiency in the second-to-last column.
//! * `LR/triangle.csv` – header `x1,x2,x3,y1,y2,y3,power_output,efficiency`.

use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use geo_regress::geometry::Triangle;

const RECT_ROWS: usize = 200;
const TRIANGLE_ROWS: usize = 150;

fn write_rows(path: &Path, header: Option<&[&str]>, rows: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    if let Some(header) = header {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn rectangle_rows(rng: &mut ChaCha8Rng) -> Result<Vec<Vec<f64>>> {
    let noise = Normal::new(0.0, 0.005)?;
    let wavelengths = [1310.0, 1550.0];

    let rows = (0..RECT_ROWS)
        .map(|i| {
            let xs = rng.random_range(0.2e-6..1.0e-6);
            let ys = rng.random_range(0.2e-6..1.0e-6);
            let zs = rng.random_range(0.2e-6..1.0e-6);
            let efficiency =
                1.131972 - 6.282955e5 * xs + 1.255411e5 * ys - 2.149598e5 * zs + noise.sample(rng);
            let power = efficiency * rng.random_range(0.9..1.1);
            vec![
                i as f64,
                wavelengths[i % wavelengths.len()],
                (i % 3) as f64,
                rng.random_range(1..5) as f64,
                xs,
                ys,
                zs,
                efficiency,
                power,
            ]
        })
        .collect();
    Ok(rows)
}

fn triangle_rows(rng: &mut ChaCha8Rng) -> Result<Vec<Vec<f64>>> {
    let noise = Normal::new(0.0, 0.02)?;

    let rows = (0..TRIANGLE_ROWS)
        .map(|_| {
            let v: Vec<f64> = (0..6).map(|_| rng.random_range(0.0..10.0)).collect();
            let (x1, x2, x3, y1, y2, y3) = (v[0], v[1], v[2], v[3], v[4], v[5]);
            let power = 0.8 + 0.05 * (x1 + x2 + x3) - 0.03 * y1 + 0.02 * y2 + 0.01 * y3
                + noise.sample(rng);
            let area = Triangle::new((x1, y1), (x2, y2), (x3, y3)).area();
            let efficiency = power / (1.0 + area);
            vec![x1, x2, x3, y1, y2, y3, power, efficiency]
        })
        .collect();
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = Path::new("LR");
    std::fs::create_dir_all(out_dir).context("creating LR/")?;
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let rect = rectangle_rows(&mut rng)?;
    let rect_path = out_dir.join("rect.csv");
    write_rows(&rect_path, None, &rect)?;
    println!("Wrote {} rows to {}", rect.len(), rect_path.display());

    let triangle = triangle_rows(&mut rng)?;
    let triangle_path = out_dir.join("triangle.csv");
    write_rows(
        &triangle_path,
        Some(&["x1", "x2", "x3", "y1", "y2", "y3", "power_output", "efficiency"]),
        &triangle,
    )?;
    println!("Wrote {} rows to {}", triangle.len(), triangle_path.display());
    Ok(())
}
