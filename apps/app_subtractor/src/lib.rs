use wit_bindgen::generate;

generate!({
    world: "subtractor",
    path: "../../wit",
});

struct Component;

impl exports::calc::demo::sub::Guest for Component {
    fn sub(x: i32, y: i32) -> i32 {
        x.wrapping_sub(y)
    }
}

export!(Component);
