fn main() {
	hero_atlas::init_logging();
	leptos::mount::mount_to_body(hero_atlas::App)
}
