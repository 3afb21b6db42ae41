use covid_census::Config;


fn main() -> Result<(), Box<dyn std::error::Error>> {
	covid_census::init_logging();
	let argv: Vec<String> = std::env::args().collect();
	let mut config = Config::from_env()?;
	if let Some(output) = argv.get(1) {
		config.output = output.into();
	}

	println!("started creating dataset at {}", chrono::Local::now());
	let n = covid_census::run(&mut *covid_census::default_output(), &config)?;
	println!("successfully wrote {} rows to {} at {}", n, config.output.display(), chrono::Local::now());
	Ok(())
}
