use serde::Serialize;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Log-normal draw, always positive like assay concentrations.
    fn concentration(&mut self, median: f64, spread: f64) -> f64 {
        let v = median * self.gauss(0.0, spread).exp();
        (v * 1000.0).round() / 1000.0
    }
}

#[derive(Serialize)]
struct LuminexRow {
    #[serde(rename = "Donor ID")]
    id: String,
    #[serde(rename = "ABeta40 pg/ug")]
    abeta40: String,
    #[serde(rename = "ABeta42 pg/ug")]
    abeta42: String,
    #[serde(rename = "tTAU pg/ug")]
    ttau: String,
    #[serde(rename = "pTAU pg/ug")]
    ptau: String,
}

#[derive(Serialize)]
struct MetadataRow {
    #[serde(rename = "Donor ID")]
    id: String,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Age at Death")]
    death_age: String,
    #[serde(rename = "Highest level of education")]
    education: String,
    #[serde(rename = "Cognitive Status")]
    cognitive_status: String,
    #[serde(rename = "Age of onset cognitive symptoms")]
    onset_age: String,
    #[serde(rename = "Age of Dementia diagnosis")]
    diagnosis_age: String,
    #[serde(rename = "Known head injury")]
    head_injury: String,
    #[serde(rename = "Thal")]
    thal: String,
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let sexes = ["Female", "Male"];
    let education = [
        "High School",
        "Trade School",
        "Bachelors",
        "Graduate (e.g. Masters, PhD)",
        "",
    ];
    let head_injury = ["Yes", "No", ""];

    let mut luminex = csv::Writer::from_path("sample_luminex.csv")?;
    let mut metadata = csv::Writer::from_path("sample_metadata.csv")?;

    let n_donors = 84;
    for i in 0..n_donors {
        let id = format!("H20.33.{:03}", i + 1);
        let dementia = rng.next_f64() < 0.5;
        let severity = if dementia { 2.0 } else { 1.0 };

        let mut values = [
            rng.concentration(25.0, 0.4),
            rng.concentration(60.0 * severity, 0.5),
            rng.concentration(300.0 * severity, 0.4),
            rng.concentration(8.0 * severity, 0.6),
        ]
        .map(|v| v.to_string());
        // Every 17th assay is incomplete so the loader has something to drop.
        if i % 17 == 16 {
            values[rng.below(4)] = String::new();
        }
        let [abeta40, abeta42, ttau, ptau] = values;
        luminex.serialize(LuminexRow {
            id: id.clone(),
            abeta40,
            abeta42,
            ttau,
            ptau,
        })?;

        // A few donors have no clinical record at all.
        if i % 23 == 5 {
            continue;
        }
        let death_age = 70 + rng.below(31);
        let onset_age = death_age.saturating_sub(3 + rng.below(10));
        let thal = if dementia { 3 + rng.below(3) } else { rng.below(3) };
        metadata.serialize(MetadataRow {
            id,
            sex: rng.pick(&sexes).to_string(),
            death_age: if death_age >= 90 { "90+".into() } else { death_age.to_string() },
            education: rng.pick(&education).to_string(),
            cognitive_status: if dementia { "Dementia" } else { "No dementia" }.to_string(),
            onset_age: if dementia { onset_age.to_string() } else { String::new() },
            diagnosis_age: if dementia { (onset_age + 2).to_string() } else { String::new() },
            head_injury: rng.pick(&head_injury).to_string(),
            thal: if i % 2 == 0 { format!("Thal {thal}") } else { thal.to_string() },
        })?;
    }

    // Metadata for a donor that was never assayed.
    metadata.serialize(MetadataRow {
        id: "H20.33.999".into(),
        sex: "Male".into(),
        death_age: "81".into(),
        education: "Bachelors".into(),
        cognitive_status: "No dementia".into(),
        onset_age: String::new(),
        diagnosis_age: String::new(),
        head_injury: "No".into(),
        thal: "Thal 1".into(),
    })?;

    luminex.flush()?;
    metadata.flush()?;

    println!("Wrote {n_donors} donors to sample_luminex.csv and sample_metadata.csv");
    Ok(())
}
