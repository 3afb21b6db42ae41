use std::process;

use covid_census::{check_fresh, check_unique, CheckFailure, DEFAULT_MAX_AGE_DAYS};


fn report(name: &str, result: Result<(), CheckFailure>) -> bool {
	match result {
		Ok(()) => {
			println!("{}: ok", name);
			true
		},
		Err(e) => {
			println!("{}: FAILED: {}", name, e);
			false
		},
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	covid_census::init_logging();
	let argv: Vec<String> = std::env::args().collect();
	let path = match argv.get(1) {
		Some(p) => p,
		None => {
			eprintln!("usage: {} FILE [MAX_AGE_DAYS]", argv[0]);
			process::exit(2);
		},
	};
	let max_age_days = match argv.get(2) {
		Some(v) => v.parse::<i64>()?,
		None => DEFAULT_MAX_AGE_DAYS,
	};

	println!("reading {} ...", path);
	let records = covid_census::read_records(covid_census::magic_open(path)?)?;
	let now = chrono::Local::now().naive_local();

	let unique = report("unique per (Date, FIPS)", check_unique(&records));
	let fresh = report(
		&format!("latest date within {} hours", max_age_days * 24),
		check_fresh(&records, now, max_age_days),
	);
	if !(unique && fresh) {
		process::exit(1);
	}
	Ok(())
}
