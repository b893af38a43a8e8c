use wit_bindgen::generate;

generate!({
    world: "adder",
    path: "../../wit",
});

struct Component;

impl exports::calc::demo::add::Guest for Component {
    fn add(x: u32, y: u32) -> u32 {
        x.wrapping_add(y)
    }
}

export!(Component);
