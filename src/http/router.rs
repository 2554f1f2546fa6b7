use regex::Regex;

/// Turns captured path segments into a route; `None` rejects the match.
pub type ParamsConverter<T> = Fn(Vec<&str>) -> Option<T> + Send + Sync;

/// Ordered list of path regexes; the first one that matches and converts wins.
pub struct RouteParser<T> {
    regex_and_converters: Vec<(Regex, Box<ParamsConverter<T>>)>,
}

impl<T> Default for RouteParser<T> {
    fn default() -> Self {
        Self {
            regex_and_converters: Vec::new(),
        }
    }
}

impl<T> RouteParser<T> {
    /// Adds a route without path params
    pub fn add_route<F>(&mut self, regex_pattern: &str, f: F) -> &mut Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.add_route_with_params(regex_pattern, move |_| Some(f()))
    }

    /// Adds a route whose capture groups are handed to the converter in order
    pub fn add_route_with_params<F>(&mut self, regex_pattern: &str, converter: F) -> &mut Self
    where
        F: Fn(Vec<&str>) -> Option<T> + Send + Sync + 'static,
    {
        let regex = Regex::new(regex_pattern).expect("route pattern is not a valid regex");
        self.regex_and_converters.push((regex, Box::new(converter)));
        self
    }

    pub fn test(&self, route: &str) -> Option<T> {
        self.regex_and_converters
            .iter()
            .filter_map(|&(ref regex, ref converter)| {
                regex.captures(route).and_then(|captures| {
                    let params = captures
                        .iter()
                        .skip(1)
                        .filter_map(|capture| capture.map(|m| m.as_str()))
                        .collect::<Vec<_>>();
                    converter(params)
                })
            }).next()
    }
}
