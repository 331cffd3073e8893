fn main() {
    // The loader provides its own `_start`; keep the host C runtime's
    // startup objects out of the link for the freestanding binary.
    println!("cargo:rustc-link-arg-bins=-nostartfiles");
}
