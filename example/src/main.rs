use rand::Rng;

use vessel::{
    log::{self, info, error},
    Error,
    LinkedSeq,
    Natural,
};

fn print_seq(label: &str, seq: &LinkedSeq<i32>) {
    print!("{label}:");
    for value in seq {
        print!(" {value}");
    }
    println!();
}

fn run() -> Result<(), Error> {
    let mut rng = rand::rng();
    let mut seq = LinkedSeq::new();
    for _ in 0..10 {
        seq.push_back(rng.random_range(0..100))?;
    }
    print_seq("unsorted", &seq);
    seq.set_comparator(Natural);
    seq.sort()?;
    print_seq("sorted", &seq);
    let probe = rng.random_range(0..100);
    seq.add_ordered(probe)?;
    info!("inserted {} in order, contains 42: {}", probe, seq.contains(&42)?);
    print_seq("with probe", &seq);
    Ok(())
}

fn main() {
    log::init();
    log::info_fmt(|fmt| {
        fmt
            .level(|spec| spec)
            .text(" ", |spec| spec)
            .message(|spec| spec);
    });
    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}
