use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STUDENTS: usize = 500;
/// Share of study-hours and attendance cells left empty.
const MISSING_RATE: f64 = 0.05;

const GENDERS: [&str; 3] = ["Female", "Male", "Other"];
const EDUCATION: [&str; 5] = ["Primary", "High School", "Bachelors", "Masters", "PhD"];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct Student {
    id: String,
    gender: &'static str,
    study_hours: Option<f64>,
    attendance: Option<f64>,
    past_score: f64,
    education: &'static str,
    internet: &'static str,
    extracurricular: &'static str,
    final_score: f64,
}

impl Student {
    fn pass_fail(&self) -> &'static str {
        if self.final_score >= 60.0 {
            "Pass"
        } else {
            "Fail"
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate(rng: &mut SimpleRng) -> Vec<Student> {
    (0..STUDENTS)
        .map(|i| {
            let gender = rng.pick(&GENDERS);
            let education_idx = (rng.next_u64() % EDUCATION.len() as u64) as usize;
            let study = rng.gauss(15.0, 6.0).clamp(0.0, 40.0);
            let attendance = rng
                .gauss(78.0 + 2.0 * education_idx as f64, 10.0)
                .clamp(40.0, 100.0);
            let past = rng.gauss(70.0, 12.0).clamp(0.0, 100.0);
            let final_score =
                (20.0 + 1.1 * study + 0.3 * attendance + 0.2 * past + rng.gauss(0.0, 6.0))
                    .clamp(0.0, 100.0);

            Student {
                id: format!("S{:04}", i + 1),
                gender,
                study_hours: (!rng.chance(MISSING_RATE)).then(|| round1(study)),
                attendance: (!rng.chance(MISSING_RATE)).then(|| round1(attendance)),
                past_score: past.round(),
                education: EDUCATION[education_idx],
                internet: rng.pick(&["Yes", "No"]),
                extracurricular: rng.pick(&["Yes", "No"]),
                final_score: final_score.round(),
            }
        })
        .collect()
}

const HEADER: [&str; 10] = [
    "Student_ID",
    "Gender",
    "Study_Hours_per_Week",
    "Attendance_Rate",
    "Past_Exam_Scores",
    "Parental_Education_Level",
    "Internet_Access_at_Home",
    "Extracurricular_Activities",
    "Final_Exam_Score",
    "Pass_Fail",
];

fn write_csv(path: &Path, students: &[Student]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADER)?;
    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for s in students {
        writer.write_record([
            s.id.clone(),
            s.gender.to_string(),
            cell(s.study_hours),
            cell(s.attendance),
            s.past_score.to_string(),
            s.education.to_string(),
            s.internet.to_string(),
            s.extracurricular.to_string(),
            s.final_score.to_string(),
            s.pass_fail().to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, students: &[Student]) -> Result<()> {
    let text = |f: fn(&Student) -> String| -> ArrayRef {
        Arc::new(StringArray::from(students.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&Student) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(students.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        text(|s| s.id.clone()),
        text(|s| s.gender.to_string()),
        number(|s| s.study_hours),
        number(|s| s.attendance),
        number(|s| Some(s.past_score)),
        text(|s| s.education.to_string()),
        text(|s| s.internet.to_string()),
        text(|s| s.extracurricular.to_string()),
        number(|s| Some(s.final_score)),
        text(|s| s.pass_fail().to_string()),
    ];
    let fields: Vec<Field> = HEADER
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "student_performance_dataset.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let students = generate(&mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, &students)?,
        Some("parquet") => write_parquet(path, &students)?,
        _ => bail!("output must end in .csv or .parquet: {output}"),
    }

    let missing = students
        .iter()
        .filter(|s| s.study_hours.is_none() || s.attendance.is_none())
        .count();
    println!(
        "Wrote {} students ({missing} with missing values) to {output}",
        students.len()
    );
    Ok(())
}
