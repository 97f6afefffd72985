fn main() -> anyhow::Result<()> {
    wcanvas_viewer::run()
}
