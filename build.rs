fn main() {
    println!("cargo:rustc-link-search=native=/opt/homebrew/lib");
    println!("cargo:rustc-link-search=native=/usr/local/lib");
    println!("cargo:rustc-link-lib=ogg");
    println!("cargo:rustc-link-lib=opus");
    println!("cargo:rustc-link-lib=opusfile");
}
