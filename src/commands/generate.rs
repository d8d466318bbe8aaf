//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Scan the content once and write the whole site
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let index = blog.loader().scan()?;
    tracing::info!("Loaded {} posts from {:?}", index.len(), blog.content_dir);

    let generator = Generator::new(blog)?;
    let pages = generator.generate(&index)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages into {:?} in {:.2}s",
        pages,
        blog.public_dir,
        duration.as_secs_f64()
    );

    Ok(())
}
