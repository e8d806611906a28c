use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mapvalue::engine::Mapper;
use mapvalue::error::Result;
use mapvalue::overrides::Overrides;
use mapvalue::render::{render_all, separator};
use mapvalue::sample::{self, SampleGenerator, UserVm, DESCRIPTION};
use mapvalue::settings::Settings;

// Usage: mapvalue [config file]
fn main() -> Result<()> {
    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!(?settings, "starting mapvalue");

    let mapper = Mapper::from_settings(Arc::new(sample::registry()?), &settings);
    let mut generator = SampleGenerator::from_settings(&settings.sample);

    let user = generator.user();
    println!("Map Original");
    let original: UserVm = mapper.map(&user, &Overrides::new())?;
    print!("{}", render_all(&[original])?);
    println!("{}", separator());

    println!("Map by value");
    let overrides = Overrides::new().shared(DESCRIPTION, settings.description.clone());
    let by_value: UserVm = mapper.map(&user, &overrides)?;
    print!("{}", render_all(&[by_value])?);
    println!("{}", separator());

    println!("Map by collection");
    let users = generator.users(settings.sample.users);
    let overrides = Overrides::new().shared(DESCRIPTION, settings.collection_description.clone());
    let by_collection: Vec<UserVm> = mapper.map_many(&users, &overrides)?;
    print!("{}", render_all(&by_collection)?);

    info!(users = users.len(), "done");
    Ok(())
}
