fn main() {
    stretchy_square::run();
}
