use std::io;
use std::io::Write;
use std::time;

use log::info;


pub trait ProgressSink {
	fn update(&mut self, inow: usize, n: Option<usize>);
	fn finish(&mut self, inow: usize, n: Option<usize>);
}


/// Carriage-return progress line for interactive terminals.
pub struct ProgressMeter {
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
}

impl ProgressMeter {
	pub fn start() -> Self {
		let now = time::Instant::now();
		Self{
			t0: now,
			tprev: now,
			iprev: 0,
		}
	}

	fn print(&self, inow: usize, n: Option<usize>, rate: f64, end: &str) {
		match n {
			Some(n) if n > 0 => {
				let done = (inow as f64) / (n as f64);
				print!("{:6.0}% [{:6.2}/s]{}", done * 100.0, rate, end);
			},
			_ => print!("{:12} [{:6.2}/s]{}", inow, rate, end),
		}
		// progress output is best-effort
		let _ = io::stdout().flush();
	}
}

impl ProgressSink for ProgressMeter {
	fn update(&mut self, inow: usize, n: Option<usize>) {
		let now = time::Instant::now();
		let dt = (now - self.tprev).as_secs_f64();
		let rate = inow.saturating_sub(self.iprev) as f64 / dt;
		self.print(inow, n, rate, "\r");
		self.iprev = inow;
		self.tprev = now;
	}

	fn finish(&mut self, inow: usize, n: Option<usize>) {
		let dt = self.t0.elapsed().as_secs_f64();
		let rate = inow as f64 / dt;
		self.print(inow, n.map(|_| inow), rate, "\n");
		self.iprev = inow;
		self.tprev = time::Instant::now();
	}
}


/// Progress reporting through the log facade, for non-interactive runs.
pub struct LogProgress {
	t0: time::Instant,
}

impl LogProgress {
	pub fn new() -> Self {
		Self{t0: time::Instant::now()}
	}
}

impl ProgressSink for LogProgress {
	fn update(&mut self, inow: usize, n: Option<usize>) {
		match n {
			Some(n) => info!("progress: {}/{}", inow, n),
			None => info!("progress: {}", inow),
		}
	}

	fn finish(&mut self, inow: usize, _n: Option<usize>) {
		info!("done: {} in {:.2}s", inow, self.t0.elapsed().as_secs_f64());
		self.t0 = time::Instant::now();
	}
}


/// A sink which discards everything.
pub struct NullProgress;

impl ProgressSink for NullProgress {
	fn update(&mut self, _inow: usize, _n: Option<usize>) {}
	fn finish(&mut self, _inow: usize, _n: Option<usize>) {}
}


pub fn default_output() -> Box<dyn ProgressSink> {
	if isatty::stdout_isatty() {
		Box::new(ProgressMeter::start())
	} else {
		Box::new(LogProgress::new())
	}
}


/// Meter over an unknown number of items.
pub struct CountMeter<'s, S: ProgressSink + ?Sized> {
	sink: &'s mut S,
}

impl<'s, S: ProgressSink + ?Sized> CountMeter<'s, S> {
	pub fn new(sink: &'s mut S) -> Self {
		Self{sink}
	}

	pub fn update(&mut self, inow: usize) {
		self.sink.update(inow, None);
	}

	pub fn finish(self, n: usize) {
		self.sink.finish(n, None);
	}
}


/// Meter over a known number of steps.
pub struct StepMeter<'s, S: ProgressSink + ?Sized> {
	sink: &'s mut S,
	n: usize,
}

impl<'s, S: ProgressSink + ?Sized> StepMeter<'s, S> {
	pub fn new(sink: &'s mut S, n: usize) -> Self {
		Self{sink, n}
	}

	pub fn update(&mut self, inow: usize) {
		self.sink.update(inow, Some(self.n));
	}

	pub fn finish(self) {
		self.sink.finish(self.n, Some(self.n));
	}
}
