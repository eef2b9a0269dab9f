use argh::FromArgs;
use cudarl_tensor::Vector1D;
use rand::{rngs::StdRng, SeedableRng};

#[derive(FromArgs)]
/// Walk through the Vector1D API: factories, arithmetic and rendering
struct Args {
    /// number of elements in each vector
    #[argh(option, short = 's', default = "5")]
    size: usize,

    /// seed for reproducible random vectors
    #[argh(option)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let ones = Vector1D::ones(args.size);
    let random = match args.seed {
        Some(seed) => {
            log::info!("drawing random vector with seed {seed}");
            Vector1D::random_with(args.size, &mut StdRng::seed_from_u64(seed))
        }
        None => Vector1D::random(args.size),
    };

    println!("ones = {ones}");
    println!("random = {random}");

    let sum = (&ones + &random)?;
    println!("ones + random = {sum}");

    let scaled = &random * 2.0;
    println!("random * 2 = {scaled}");

    log::info!("done with {} element vectors", args.size);

    Ok(())
}
