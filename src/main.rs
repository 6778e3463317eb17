mod allocator;

use sweetpgp_rs::app::App;

fn main() -> anyhow::Result<()> {
    App::init()?.execute()
}
